//! Feed composition.
//!
//! Every feed (index, group, profile, follow) is a [`PostFilter`] paged
//! through [`FeedComposer::compose`]. Only the index goes through the
//! [`HomeFeedCache`]; the others are always read fresh.

use uuid::Uuid;
use yatube_common::{
    error::{YatubeError, YatubeResult},
    models::{Group, PostView, User},
    pagination::{Page, PageRequest, Paginator},
};
use yatube_db::{
    any_compat::count_to_usize,
    repository::{
        groups,
        posts::{self, PostFilter},
        users,
    },
    Database,
};

use crate::{cache::HomeFeedCache, services::SocialGraph};

pub type PostPage = Page<PostView>;

#[derive(Clone)]
pub struct FeedComposer {
    db: Database,
    social: SocialGraph,
    index_cache: HomeFeedCache<PostPage>,
}

impl FeedComposer {
    pub fn new(db: Database, social: SocialGraph, index_cache: HomeFeedCache<PostPage>) -> Self {
        Self {
            db,
            social,
            index_cache,
        }
    }

    /// One page of the posts matching `filter`, newest first.
    pub async fn compose(&self, filter: &PostFilter, request: PageRequest) -> YatubeResult<PostPage> {
        let count = posts::count_posts(&self.db.pool, filter).await?;
        let window = Paginator::new(count_to_usize(count)).window(request);

        let items = if window.limit == 0 {
            Vec::new()
        } else {
            posts::list_posts(&self.db.pool, filter, window.limit, window.offset).await?
        };
        Ok(window.into_page(items))
    }

    /// The global feed, served from the home-feed cache.
    ///
    /// Requests that resolve to the same page context share an entry, so
    /// `?page=01`, `?page=1`, `?page=abc` and no `page` at all are one key.
    pub async fn index(&self, raw_page: Option<&str>) -> YatubeResult<PostPage> {
        let request = PageRequest::parse(raw_page);
        self.index_cache
            .get_or_try_insert_with(&index_key(request), || {
                self.compose(&PostFilter::All, request)
            })
            .await
    }

    /// Force the next index read of every page to recompute.
    pub async fn clear_index_cache(&self) {
        self.index_cache.clear().await;
    }

    pub async fn group_feed(&self, slug: &str, request: PageRequest) -> YatubeResult<(Group, PostPage)> {
        let group = groups::find_by_slug(&self.db.pool, slug)
            .await?
            .ok_or_else(|| YatubeError::not_found("Group"))?;
        let page = self.compose(&PostFilter::Group(group.id), request).await?;
        Ok((group, page))
    }

    pub async fn profile_feed(
        &self,
        username: &str,
        request: PageRequest,
    ) -> YatubeResult<(User, PostPage)> {
        let author = users::find_by_username(&self.db.pool, username)
            .await?
            .ok_or_else(|| YatubeError::not_found("User"))?;
        let page = self.compose(&PostFilter::Author(author.id), request).await?;
        Ok((author, page))
    }

    /// Posts by everyone `user` follows.
    pub async fn follow_feed(&self, user: Uuid, request: PageRequest) -> YatubeResult<PostPage> {
        let authors = self.social.followed_authors(user).await?;
        self.compose(&PostFilter::Authors(authors), request).await
    }
}

fn index_key(request: PageRequest) -> String {
    match request {
        PageRequest::Missing | PageRequest::Invalid => "1".to_string(),
        // Zero and below all resolve to the last page
        PageRequest::Number(n) => n.max(0).to_string(),
    }
}
