//! Navigation history carried by a surface

use url::Url;

use crate::utils::Result;

/// A committed history entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEntry {
    url: Url,
    title: String,
}

impl NavigationEntry {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            title: String::new(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Back/forward history plus the currently committed entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationController {
    entries: Vec<NavigationEntry>,
    last_committed: Option<usize>,
}

impl NavigationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a navigation to `url`, dropping any forward history.
    ///
    /// Bare host names are treated as https, matching what the URL bar does.
    pub fn navigate(&mut self, url: &str) -> Result<()> {
        let url = parse_navigation_url(url)?;

        if let Some(committed) = self.last_committed {
            self.entries.truncate(committed + 1);
        }
        self.entries.push(NavigationEntry::new(url));
        self.last_committed = Some(self.entries.len() - 1);
        Ok(())
    }

    /// Set the title of the committed entry
    pub fn set_title(&mut self, title: impl Into<String>) {
        if let Some(index) = self.last_committed {
            self.entries[index].title = title.into();
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.last_committed.is_some_and(|i| i > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        self.last_committed
            .is_some_and(|i| i + 1 < self.entries.len())
    }

    pub fn go_back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.last_committed = self.last_committed.map(|i| i - 1);
        true
    }

    pub fn go_forward(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.last_committed = self.last_committed.map(|i| i + 1);
        true
    }

    pub fn last_committed_entry(&self) -> Option<&NavigationEntry> {
        self.last_committed.map(|i| &self.entries[i])
    }

    pub fn last_committed_index(&self) -> Option<usize> {
        self.last_committed
    }

    /// Number of entries in the back/forward list
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[NavigationEntry] {
        &self.entries
    }

    /// Replace this history with a verbatim copy of `other`
    pub fn copy_state_from(&mut self, other: &NavigationController) {
        self.entries = other.entries.clone();
        self.last_committed = other.last_committed;
    }
}

fn parse_navigation_url(input: &str) -> Result<Url> {
    match Url::parse(input) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Ok(Url::parse(&format!("https://{}", input))?)
        }
        Err(e) => Err(e.into()),
    }
}
