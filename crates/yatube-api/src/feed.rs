//! Feed assembly: page contexts for the four listings and the post detail.
//!
//! Each listing counts its posts, resolves the requested page against that
//! count and then fetches only the rows of that page, newest first, through
//! the store's per-feed query functions.

use serde::{Deserialize, Serialize};
use yatube_common::{
    error::{YatubeError, YatubeResult},
    models::{CommentView, Group, PostRow, PostView, UserResponse},
    pagination::{Page, PageWindow},
    urls,
};
use yatube_db::repository::{comments, follows, groups, posts, users};

use crate::{
    AppState,
    forms::FormContext,
    render::{self, Rendered},
};

/// `?page=` as sent; parsed leniently by [`PageWindow::resolve`].
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn raw(&self) -> Option<&str> {
        self.page.as_deref()
    }
}

#[derive(Serialize)]
struct ListingContext {
    page_obj: Page<PostView>,
}

#[derive(Serialize)]
struct GroupContext {
    group: Group,
    page_obj: Page<PostView>,
}

#[derive(Serialize)]
struct ProfileContext {
    author: UserResponse,
    posts_count: i64,
    following: bool,
    followers_count: i64,
    following_count: i64,
    follow_url: String,
    unfollow_url: String,
    page_obj: Page<PostView>,
}

#[derive(Serialize)]
struct DetailContext {
    post: PostView,
    posts_count: i64,
    /// Author's full name.
    author: String,
    title: String,
    form: FormContext,
    /// Where the comment form posts to.
    comment_url: String,
    edit_url: String,
    comments: Vec<CommentView>,
}

/// Resolve `requested` against a listing of `total` posts.
pub fn resolve_window(total: i64, page_size: usize, requested: Option<&str>) -> PageWindow {
    PageWindow::resolve(usize::try_from(total).unwrap_or(0), page_size, requested)
}

fn page_of(rows: Vec<PostRow>, window: PageWindow) -> Page<PostView> {
    Page::new(rows.into_iter().map(PostView::from).collect(), window)
}

/// All posts.
pub async fn index_feed(state: &AppState, page: Option<&str>) -> YatubeResult<Rendered> {
    let pool = &state.db.pool;
    let window = resolve_window(posts::count_all(pool).await?, state.settings.page_size, page);
    let rows = posts::list_all(pool, window.limit(), window.offset()).await?;
    Rendered::new(
        render::INDEX,
        ListingContext {
            page_obj: page_of(rows, window),
        },
    )
}

/// Posts of one group; unknown slugs are a 404.
pub async fn group_feed(state: &AppState, slug: &str, page: Option<&str>) -> YatubeResult<Rendered> {
    let pool = &state.db.pool;
    let group = groups::find_by_slug(pool, slug)
        .await?
        .ok_or_else(|| YatubeError::not_found("Group"))?;

    let window = resolve_window(
        posts::count_by_group(pool, group.id).await?,
        state.settings.page_size,
        page,
    );
    let rows = posts::posts_by_group(pool, group.id, window.limit(), window.offset()).await?;

    Rendered::new(
        render::GROUP_LIST,
        GroupContext {
            group,
            page_obj: page_of(rows, window),
        },
    )
}

/// Posts of one author, with follow state as seen by `viewer`.
pub async fn profile_feed(
    state: &AppState,
    username: &str,
    viewer: Option<i64>,
    page: Option<&str>,
) -> YatubeResult<Rendered> {
    let pool = &state.db.pool;
    let author = users::find_by_username(pool, username)
        .await?
        .ok_or_else(|| YatubeError::not_found("User"))?;

    let following = match viewer {
        Some(viewer_id) => follows::exists(pool, viewer_id, author.id).await?,
        None => false,
    };
    let posts_count = posts::count_by_author(pool, author.id).await?;
    let window = resolve_window(posts_count, state.settings.page_size, page);
    let rows = posts::posts_by_author(pool, author.id, window.limit(), window.offset()).await?;

    let context = ProfileContext {
        posts_count,
        following,
        followers_count: follows::count_followers(pool, author.id).await?,
        following_count: follows::count_following(pool, author.id).await?,
        follow_url: urls::profile_follow(&author.username),
        unfollow_url: urls::profile_unfollow(&author.username),
        author: author.into(),
        page_obj: page_of(rows, window),
    };
    Rendered::new(render::PROFILE, context)
}

/// Posts by everyone `viewer` follows.
pub async fn follow_feed(state: &AppState, viewer: i64, page: Option<&str>) -> YatubeResult<Rendered> {
    let pool = &state.db.pool;
    let window = resolve_window(
        posts::count_by_followed_authors(pool, viewer).await?,
        state.settings.page_size,
        page,
    );
    let rows =
        posts::posts_by_followed_authors(pool, viewer, window.limit(), window.offset()).await?;
    Rendered::new(
        render::FOLLOW,
        ListingContext {
            page_obj: page_of(rows, window),
        },
    )
}

/// First `symbols` characters of a post's text.
pub fn title_of(text: &str, symbols: usize) -> String {
    text.chars().take(symbols).collect()
}

/// A single post with its comments, oldest first.
pub async fn post_detail(state: &AppState, post_id: i64) -> YatubeResult<Rendered> {
    let pool = &state.db.pool;
    let row = posts::find_row_by_id(pool, post_id)
        .await?
        .ok_or_else(|| YatubeError::not_found("Post"))?;
    let post = PostView::from(row);

    let posts_count = posts::count_by_author(pool, post.author.id).await?;
    let comments = comments::list_for_post(pool, post.id)
        .await?
        .into_iter()
        .map(CommentView::from)
        .collect();

    let context = DetailContext {
        posts_count,
        author: post.author.full_name.clone(),
        title: title_of(&post.text, state.settings.title_symbols),
        form: FormContext::comment_form(),
        comment_url: urls::add_comment(post.id),
        edit_url: urls::post_edit(post.id),
        comments,
        post,
    };
    Rendered::new(render::POST_DETAIL, context)
}
