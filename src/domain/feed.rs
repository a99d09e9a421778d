use serde_json::Value;

/// The raw feed document as fetched.
pub type RawPayload = Value;

/// Payload variants the normalizer knows how to map.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedShape<'a> {
    CanonicalGames(&'a [Value]),
    LegacyPosts(&'a [Value]),
    Empty,
}

impl<'a> FeedShape<'a> {
    /// A `games` array wins over `posts`; anything else is empty.
    pub fn classify(payload: &'a RawPayload) -> Self {
        if let Some(games) = payload.get("games").and_then(Value::as_array) {
            return FeedShape::CanonicalGames(games);
        }
        if let Some(posts) = payload.get("posts").and_then(Value::as_array) {
            return FeedShape::LegacyPosts(posts);
        }
        FeedShape::Empty
    }

    pub fn name(&self) -> &'static str {
        match self {
            FeedShape::CanonicalGames(_) => "games",
            FeedShape::LegacyPosts(_) => "posts",
            FeedShape::Empty => "empty",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn games_take_precedence_over_posts() {
        let payload = json!({ "games": [], "posts": [{ "id": "p1" }] });
        assert_eq!(FeedShape::classify(&payload), FeedShape::CanonicalGames(&[]));
    }

    #[test]
    fn non_array_collections_are_empty() {
        assert_eq!(
            FeedShape::classify(&json!({ "games": "nope" })),
            FeedShape::Empty
        );
        assert_eq!(FeedShape::classify(&json!([1, 2])), FeedShape::Empty);
        assert_eq!(FeedShape::classify(&Value::Null), FeedShape::Empty);
    }

    #[test]
    fn posts_are_legacy() {
        let payload = json!({ "posts": [{ "id": "p1" }] });
        assert_eq!(FeedShape::classify(&payload).name(), "posts");
    }
}
