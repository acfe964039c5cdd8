//! Side-loaded resources attached to a primary fetch result.
//!
//! # Design
//! A post response embeds the comments on it and the users who wrote them in
//! one heterogeneous list. `Included` keeps that list as a sequence of the
//! `Resource` sum type in arrival order. `by_kind` filters on the
//! discriminator and hands out borrowed views keyed by id, so the same
//! sequence can be queried for several kinds without being modified.

use std::collections::HashMap;
use std::fmt;

use crate::model::{Comment, Model, ModelKind, Post, User};

/// One side-loaded entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    User(User),
    Post(Post),
    Comment(Comment),
}

impl Model for Resource {
    fn kind(&self) -> ModelKind {
        match self {
            Resource::User(_) => ModelKind::User,
            Resource::Post(_) => ModelKind::Post,
            Resource::Comment(_) => ModelKind::Comment,
        }
    }

    fn id(&self) -> i64 {
        match self {
            Resource::User(u) => u.id,
            Resource::Post(p) => p.id,
            Resource::Comment(c) => c.id,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::User(u) => u.fmt(f),
            Resource::Post(p) => p.fmt(f),
            Resource::Comment(c) => c.fmt(f),
        }
    }
}

impl From<User> for Resource {
    fn from(user: User) -> Self {
        Resource::User(user)
    }
}

impl From<Post> for Resource {
    fn from(post: Post) -> Self {
        Resource::Post(post)
    }
}

impl From<Comment> for Resource {
    fn from(comment: Comment) -> Self {
        Resource::Comment(comment)
    }
}

/// Entity kinds that can be pulled back out of a `Resource`.
pub trait IncludedModel: Model + Sized {
    fn from_resource(resource: &Resource) -> Option<&Self>;
}

impl IncludedModel for User {
    fn from_resource(resource: &Resource) -> Option<&Self> {
        match resource {
            Resource::User(u) => Some(u),
            _ => None,
        }
    }
}

impl IncludedModel for Post {
    fn from_resource(resource: &Resource) -> Option<&Self> {
        match resource {
            Resource::Post(p) => Some(p),
            _ => None,
        }
    }
}

impl IncludedModel for Comment {
    fn from_resource(resource: &Resource) -> Option<&Self> {
        match resource {
            Resource::Comment(c) => Some(c),
            _ => None,
        }
    }
}

/// Ordered, mixed-kind collection of side-loaded entities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Included {
    resources: Vec<Resource>,
}

impl Included {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, resource: impl Into<Resource>) {
        self.resources.push(resource.into());
    }

    pub fn clear(&mut self) {
        self.resources.clear();
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Resources in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    /// Every entity of kind `T`, keyed by id. A later entry with the same id
    /// replaces an earlier one.
    pub fn by_kind<T: IncludedModel>(&self) -> HashMap<i64, &T> {
        self.resources
            .iter()
            .filter_map(T::from_resource)
            .map(|model| (model.id(), model))
            .collect()
    }

    /// Entities of kind `T` in arrival order, duplicates kept.
    pub fn ordered<T: IncludedModel>(&self) -> Vec<&T> {
        self.resources.iter().filter_map(T::from_resource).collect()
    }
}

impl Extend<Resource> for Included {
    fn extend<I: IntoIterator<Item = Resource>>(&mut self, iter: I) {
        self.resources.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Included {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, name: &str) -> User {
        User {
            id,
            name: name.to_string(),
            display_name: name.to_uppercase(),
            ..User::empty()
        }
    }

    fn comment(id: i64, content: &str) -> Comment {
        Comment {
            id,
            post_id: 1,
            created_user_id: 1,
            created_date: "2022-01-01".to_string(),
            content: content.to_string(),
            like_count: 0,
            edited_date: None,
            edited_user_id: None,
            hidden: false,
            hidden_date: None,
            hidden_user_id: None,
            ip_address: "127.0.0.1".to_string(),
        }
    }

    #[test]
    fn by_kind_filters_on_discriminator() {
        let mut included = Included::new();
        included.add(comment(10, "first"));
        included.add(user(1, "a"));
        included.add(comment(11, "second"));

        let comments = included.by_kind::<Comment>();
        let users = included.by_kind::<User>();
        let posts = included.by_kind::<Post>();

        assert_eq!(comments.len(), 2);
        assert_eq!(users.len(), 1);
        assert!(posts.is_empty());
        assert_eq!(users[&1].name, "a");
        assert_eq!(included.len(), 3, "filtering must not consume the sequence");
    }

    #[test]
    fn by_kind_last_duplicate_wins() {
        let mut included = Included::new();
        included.add(user(1, "old"));
        included.add(user(1, "new"));

        let users = included.by_kind::<User>();
        assert_eq!(users.len(), 1);
        assert_eq!(users[&1].name, "new");
        assert_eq!(included.ordered::<User>().len(), 2);
    }

    #[test]
    fn clear_empties_the_store() {
        let mut included = Included::new();
        included.add(user(1, "a"));
        included.clear();
        assert!(included.is_empty());
        assert!(included.by_kind::<User>().is_empty());
    }

    #[test]
    fn ordered_preserves_arrival_order() {
        let mut included = Included::new();
        included.add(comment(12, "b"));
        included.add(user(1, "a"));
        included.add(comment(3, "c"));
        let ids: Vec<i64> = included.ordered::<Comment>().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![12, 3]);
    }

    #[test]
    fn resource_exposes_kind_and_id() {
        let resource = Resource::from(comment(7, "x"));
        assert_eq!(resource.kind(), ModelKind::Comment);
        assert_eq!(resource.id(), 7);
    }
}
