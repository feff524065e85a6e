//! Mount point for the utterances comments widget.
//!
//! The widget is a third-party script; all this module does is expose the
//! anchor it attaches to and hand out the script tag exactly once per view.

use html_escape::encode_double_quoted_attribute;

use crate::config::CommentsConfig;

pub const ANCHOR_ID: &str = "inject-comments-for-utterances";
pub const SCRIPT_SRC: &str = "https://utteranc.es/client.js";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTag {
    pub attributes: Vec<(&'static str, String)>,
}

impl ScriptTag {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn to_html(&self) -> String {
        let attrs: String = self
            .attributes
            .iter()
            .map(|(key, value)| format!(" {}=\"{}\"", key, encode_double_quoted_attribute(value)))
            .collect();
        format!("<script{}></script>", attrs)
    }
}

pub struct CommentsWidget {
    config: CommentsConfig,
    mounted: bool,
}

impl CommentsWidget {
    pub fn new(config: CommentsConfig) -> Self {
        Self {
            config,
            mounted: false,
        }
    }

    pub fn anchor_html(&self) -> String {
        format!("<div id=\"{}\"></div>", ANCHOR_ID)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Returns the script to inject into the anchor on first display, and
    /// `None` on every later call.
    pub fn mount(&mut self) -> Option<ScriptTag> {
        if self.mounted {
            tracing::debug!("Comments widget already mounted");
            return None;
        }
        self.mounted = true;

        Some(ScriptTag {
            attributes: vec![
                ("src", SCRIPT_SRC.to_string()),
                ("crossorigin", "anonymous".to_string()),
                ("async", "async".to_string()),
                ("repo", self.config.repo.clone()),
                ("issue-term", self.config.issue_term.clone()),
                ("theme", self.config.theme.clone()),
            ],
        })
    }
}
