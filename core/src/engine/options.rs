//! Call-shape normalization for the public API.
//!
//! The severity shorthands historically accepted three shapes for the
//! second argument: a bare title, an options object, or both. They all
//! collapse into one canonical [`ToastOptions`] before the engine sees
//! them, via [`ToastArgs`].

use serde_json::Value;

use herald_types::{Position, Severity};

/// Caller-supplied toast fields. Everything is optional; missing fields
/// fall back to provider defaults at open time. Also serves as the
/// partial patch for `update`, where only `Some` fields are merged.
#[derive(Debug, Clone, Default)]
pub struct ToastOptions {
    pub severity: Option<Severity>,
    pub position: Option<Position>,
    /// Auto-dismiss duration in milliseconds; 0 disables auto-dismiss.
    pub duration_ms: Option<u64>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Opaque renderer payload (icon, action, custom data).
    pub payload: Option<Value>,
    pub closable: Option<bool>,
    pub show_icon: Option<bool>,
    pub show_progress: Option<bool>,
    pub pause_on_hover: Option<bool>,
}

impl ToastOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Overlay `other` on top of `self`: any `Some` field wins.
    pub fn merge(&mut self, other: ToastOptions) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() { self.$field = other.$field; })*
            };
        }
        take!(
            severity,
            position,
            duration_ms,
            title,
            description,
            payload,
            closable,
            show_icon,
            show_progress,
            pause_on_hover
        );
    }

    /// Canonical form of a severity shorthand call: the description
    /// plus whatever shape the second argument took. Options override
    /// the bare title (and may even override the severity), matching
    /// the merge order callers expect.
    pub fn from_shorthand(severity: Severity, description: String, args: ToastArgs) -> Self {
        let mut options = ToastOptions {
            severity: Some(severity),
            description: Some(description),
            title: args.title,
            ..Default::default()
        };
        options.merge(args.options);
        options
    }
}

/// Normalized second argument of the severity shorthands.
#[derive(Debug, Clone, Default)]
pub struct ToastArgs {
    pub title: Option<String>,
    pub options: ToastOptions,
}

impl From<()> for ToastArgs {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl From<&str> for ToastArgs {
    fn from(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            options: ToastOptions::default(),
        }
    }
}

impl From<String> for ToastArgs {
    fn from(title: String) -> Self {
        Self {
            title: Some(title),
            options: ToastOptions::default(),
        }
    }
}

impl From<ToastOptions> for ToastArgs {
    fn from(options: ToastOptions) -> Self {
        Self {
            title: None,
            options,
        }
    }
}

impl From<(&str, ToastOptions)> for ToastArgs {
    fn from((title, options): (&str, ToastOptions)) -> Self {
        Self {
            title: Some(title.to_string()),
            options,
        }
    }
}

impl From<(String, ToastOptions)> for ToastArgs {
    fn from((title, options): (String, ToastOptions)) -> Self {
        Self {
            title: Some(title),
            options,
        }
    }
}
