// Navigation - the three logical views and their redirect rules
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "id", rename_all = "lowercase")]
pub enum View {
    Login,
    List,
    Editor(Option<String>),
}

impl View {
    /// Parse a view path. Unknown paths fall back to the list.
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim().trim_end_matches('/');
        match trimmed {
            "" => Self::List,
            "/login" => Self::Login,
            "/editor" => Self::Editor(None),
            _ => match trimmed.strip_prefix("/editor/") {
                Some(id) if !id.is_empty() && !id.contains('/') => {
                    Self::Editor(Some(id.to_string()))
                }
                _ => Self::List,
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::List => "/".to_string(),
            Self::Editor(None) => "/editor".to_string(),
            Self::Editor(Some(id)) => format!("/editor/{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Render(View),
    Redirect(View),
}

impl Resolution {
    pub fn target(&self) -> &View {
        match self {
            Self::Render(view) | Self::Redirect(view) => view,
        }
    }
}

/// Unauthenticated users only ever see the login view; authenticated users
/// never do.
pub fn resolve(requested: View, authenticated: bool) -> Resolution {
    match (requested, authenticated) {
        (View::Login, true) => Resolution::Redirect(View::List),
        (View::Login, false) => Resolution::Render(View::Login),
        (_, false) => Resolution::Redirect(View::Login),
        (view, true) => Resolution::Render(view),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(View::from_path("/"), View::List);
        assert_eq!(View::from_path("/login"), View::Login);
        assert_eq!(View::from_path("/editor"), View::Editor(None));
        assert_eq!(View::from_path("/editor/"), View::Editor(None));
        assert_eq!(
            View::from_path("/editor/k3j9x"),
            View::Editor(Some("k3j9x".to_string()))
        );
        assert_eq!(View::from_path("/editor/a/b"), View::List);
        assert_eq!(View::from_path("/settings"), View::List);
    }

    #[test]
    fn test_resolve_redirects() {
        assert_eq!(resolve(View::List, false), Resolution::Redirect(View::Login));
        assert_eq!(
            resolve(View::Editor(Some("x".into())), false),
            Resolution::Redirect(View::Login)
        );
        assert_eq!(resolve(View::Login, false), Resolution::Render(View::Login));
        assert_eq!(resolve(View::Login, true).target(), &View::List);
        assert_eq!(resolve(View::Login, true), Resolution::Redirect(View::List));
        assert_eq!(
            resolve(View::Editor(None), true),
            Resolution::Render(View::Editor(None))
        );
    }

    #[test]
    fn test_path_round_trip() {
        let view = View::Editor(Some("abc".into()));
        assert_eq!(View::from_path(&view.path()), view);
        assert_eq!(View::List.path(), "/");
    }
}
