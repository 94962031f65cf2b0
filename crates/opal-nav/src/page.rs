//! The engine's view of page markup.
//!
//! Templating and DOM insertion belong to external collaborators; the
//! engine only needs enough structure to rewrite link targets and
//! resolve form actions, so a [`Page`] carries just those.

/// A hyperlink reference found in page markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
}

/// A form found in page markup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Form {
    /// Explicit `action` attribute, if any.
    pub action: Option<String>,
    /// Field name/value pairs in document order.
    pub fields: Vec<(String, String)>,
}

/// A page as handed to the engine by the loader/templating collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    /// Element id for internal pages.
    pub id: Option<String>,
    /// Source URL for externally loaded pages.
    pub url: Option<String>,
    pub title: String,
    pub links: Vec<Link>,
    pub forms: Vec<Form>,
}

impl Page {
    /// An internal page already present in the document markup.
    pub fn internal(id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            ..Self::default()
        }
    }

    /// An externally loaded page.
    pub fn external(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_link(mut self, href: &str) -> Self {
        self.links.push(Link {
            href: href.to_string(),
        });
        self
    }

    pub fn with_form(mut self, form: Form) -> Self {
        self.forms.push(form);
        self
    }
}
