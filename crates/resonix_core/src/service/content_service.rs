//! Public content use-cases.
//!
//! # Responsibility
//! - Serve the read-only listings the public site renders.
//! - Apply visibility, filtering, ordering, and pagination in memory.
//!
//! # Invariants
//! - Unpublished projects, news, and posts are never returned.
//! - Inactive members are never returned.
//! - Date-sorted listings put undated entries last.

use super::pagination::PageRequest;
use super::{ServiceError, ServiceResult};
use crate::model::article::{BlogPost, Dated, NewsArticle};
use crate::model::event::Event;
use crate::model::gallery::{GalleryItem, MediaKind};
use crate::model::member::Member;
use crate::model::project::Project;
use crate::model::record::{Record, RecordId};
use crate::model::Settings;
use crate::repo::record_repo::{JsonRecordRepository, RecordRepository};
use crate::repo::settings_repo::SettingsRepository;
use crate::store::JsonStore;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Filter plus page for one listing call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// `None` when absent, empty, or `all`.
    pub filter: Option<String>,
    pub page: PageRequest,
}

impl ListQuery {
    pub fn new(filter: Option<&str>, page: PageRequest) -> Self {
        Self {
            filter: normalize_filter(filter),
            page,
        }
    }

    fn matches(&self, value: &str) -> bool {
        self.filter.as_deref().map_or(true, |filter| filter == value)
    }
}

/// Treats an empty or `all` filter as no filter.
pub fn normalize_filter(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty() && *value != "all")
        .map(str::to_string)
}

/// Landing-page counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SiteStats {
    pub members: usize,
    pub projects: usize,
    pub events: usize,
    pub workshops: usize,
}

/// Newest entry plus one page of the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct FeaturedPage<T> {
    pub featured: Option<T>,
    pub items: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorCount {
    pub name: String,
    pub post_count: usize,
}

pub struct ContentService {
    store: Arc<JsonStore>,
}

impl ContentService {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self { store }
    }

    pub fn stats(&self) -> ServiceResult<SiteStats> {
        let events = self.all::<Event>()?;
        Ok(SiteStats {
            members: self.all::<Member>()?.len(),
            projects: self.all::<Project>()?.len(),
            events: events.len(),
            workshops: events.iter().filter(|event| event.is_workshop()).count(),
        })
    }

    /// Events filtered on `type`, in file order.
    pub fn list_events(&self, query: &ListQuery) -> ServiceResult<Vec<Event>> {
        let events = self
            .all::<Event>()?
            .into_iter()
            .filter(|event| query.matches(&event.kind))
            .collect();
        Ok(query.page.slice(events))
    }

    pub fn get_event(&self, id: Option<RecordId>) -> ServiceResult<Event> {
        self.find(id, |_: &Event| true)
    }

    /// Published projects filtered on `category`.
    pub fn list_projects(&self, query: &ListQuery) -> ServiceResult<Vec<Project>> {
        let projects = self
            .all::<Project>()?
            .into_iter()
            .filter(|project| query.matches(&project.category) && project.is_published())
            .collect();
        Ok(query.page.slice(projects))
    }

    pub fn get_project(&self, id: Option<RecordId>) -> ServiceResult<Project> {
        self.find(id, Project::is_published)
    }

    /// Active members, unpaginated.
    pub fn list_team(&self) -> ServiceResult<Vec<Member>> {
        Ok(self
            .all::<Member>()?
            .into_iter()
            .filter(Member::is_active)
            .collect())
    }

    pub fn get_team_member(&self, id: Option<RecordId>) -> ServiceResult<Member> {
        self.find(id, Member::is_active)
    }

    /// Published news filtered on `type`, newest first.
    pub fn list_news(&self, query: &ListQuery) -> ServiceResult<FeaturedPage<NewsArticle>> {
        let news = self
            .all::<NewsArticle>()?
            .into_iter()
            .filter(|article| query.matches(&article.kind) && article.is_published())
            .collect();
        Ok(featured_page(news, query.page))
    }

    pub fn get_news_article(&self, id: Option<RecordId>) -> ServiceResult<NewsArticle> {
        self.find(id, NewsArticle::is_published)
    }

    /// Published posts filtered on `category`, newest first.
    pub fn list_blog_posts(&self, query: &ListQuery) -> ServiceResult<FeaturedPage<BlogPost>> {
        let posts = self
            .all::<BlogPost>()?
            .into_iter()
            .filter(|post| query.matches(&post.category) && post.is_published())
            .collect();
        Ok(featured_page(posts, query.page))
    }

    pub fn get_blog_post(&self, id: Option<RecordId>) -> ServiceResult<BlogPost> {
        self.find(id, BlogPost::is_published)
    }

    /// Most viewed published posts; ties go to the newer post.
    pub fn popular_posts(&self, limit: usize) -> ServiceResult<Vec<BlogPost>> {
        let mut posts: Vec<BlogPost> = self
            .all::<BlogPost>()?
            .into_iter()
            .filter(BlogPost::is_published)
            .collect();
        posts.sort_by(|a, b| {
            b.views
                .cmp(&a.views)
                .then_with(|| b.published_on().cmp(&a.published_on()))
        });
        posts.truncate(limit);
        Ok(posts)
    }

    /// Authors of published posts by post count, then name.
    pub fn top_authors(&self, limit: usize) -> ServiceResult<Vec<AuthorCount>> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for post in self
            .all::<BlogPost>()?
            .into_iter()
            .filter(BlogPost::is_published)
        {
            *counts.entry(post.author).or_default() += 1;
        }

        let mut authors: Vec<AuthorCount> = counts
            .into_iter()
            .map(|(name, post_count)| AuthorCount { name, post_count })
            .collect();
        authors.sort_by(|a, b| {
            b.post_count
                .cmp(&a.post_count)
                .then_with(|| a.name.cmp(&b.name))
        });
        authors.truncate(limit);
        Ok(authors)
    }

    /// Items of one media kind filtered on `category`.
    pub fn list_gallery(&self, kind: MediaKind, query: &ListQuery) -> ServiceResult<Vec<GalleryItem>> {
        let items = self
            .all::<GalleryItem>()?
            .into_iter()
            .filter(|item| item.kind == kind && query.matches(&item.category))
            .collect();
        Ok(query.page.slice(items))
    }

    /// Stored settings over `defaults`; stored keys win.
    pub fn settings(&self, defaults: Settings) -> ServiceResult<Settings> {
        let mut settings = defaults;
        settings.extend(SettingsRepository::new(&self.store).get()?);
        Ok(settings)
    }

    fn all<T: Record>(&self) -> ServiceResult<Vec<T>> {
        Ok(JsonRecordRepository::<T>::new(&self.store).list()?)
    }

    /// Missing, non-positive, unknown, and hidden ids all read as not found.
    fn find<T: Record>(
        &self,
        id: Option<RecordId>,
        visible: impl Fn(&T) -> bool,
    ) -> ServiceResult<T> {
        let not_found = ServiceError::NotFound { label: T::LABEL };
        let Some(id) = id.filter(|id| *id > 0) else {
            return Err(not_found);
        };
        JsonRecordRepository::<T>::new(&self.store)
            .get(id)?
            .filter(|record| visible(record))
            .ok_or(not_found)
    }
}

/// Sorts newest first, takes the head as featured, and pages the rest.
fn featured_page<T: Dated>(mut entries: Vec<T>, page: PageRequest) -> FeaturedPage<T> {
    entries.sort_by(|a, b| b.published_on().cmp(&a.published_on()));
    let mut entries = entries.into_iter();
    let featured = entries.next();
    FeaturedPage {
        featured,
        items: page.slice(entries.collect()),
    }
}
