//! Inbound events that drive the dialogue

/// An inbound webhook event, reduced to what the state machine needs
#[derive(Debug, Clone)]
pub enum Event {
    /// Plain chat message
    Message { text: String },

    /// Inline-keyboard button press
    Selection { callback_id: String, data: String },
}

impl Event {
    pub fn message(text: impl Into<String>) -> Self {
        Event::Message { text: text.into() }
    }

    pub fn selection(callback_id: impl Into<String>, data: impl Into<String>) -> Self {
        Event::Selection {
            callback_id: callback_id.into(),
            data: data.into(),
        }
    }
}

/// Decoded callback data, e.g. `rating_1200` or `tag_dp`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionData {
    Rating(i64),
    Tag(String),
}

impl SelectionData {
    pub fn parse(data: &str) -> Option<Self> {
        if let Some(rest) = data.strip_prefix("rating_") {
            rest.parse().ok().map(SelectionData::Rating)
        } else if let Some(rest) = data.strip_prefix("tag_") {
            if rest.is_empty() {
                None
            } else {
                Some(SelectionData::Tag(rest.to_lowercase()))
            }
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rating_data() {
        assert_eq!(
            SelectionData::parse("rating_1400"),
            Some(SelectionData::Rating(1400))
        );
    }

    #[test]
    fn parses_tag_data_lowercased() {
        assert_eq!(
            SelectionData::parse("tag_DP"),
            Some(SelectionData::Tag("dp".to_string()))
        );
    }

    #[test]
    fn rejects_malformed_data() {
        assert_eq!(SelectionData::parse("rating_abc"), None);
        assert_eq!(SelectionData::parse("tag_"), None);
        assert_eq!(SelectionData::parse("something_else"), None);
    }
}
