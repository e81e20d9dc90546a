use std::fmt::Display;

use clap::ValueEnum;

/// Top-level screens reachable from the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum View {
    #[default]
    Home,
    Tasks,
    Notes,
    Focus,
}

impl View {
    pub const ALL: [View; 4] = [View::Home, View::Tasks, View::Notes, View::Focus];

    pub fn label(self) -> &'static str {
        match self {
            View::Home => "Home",
            View::Tasks => "Tasks",
            View::Notes => "Notes",
            View::Focus => "Focus",
        }
    }

    /// Matches the navigation words typed in the shell. `dashboard` is accepted for home.
    pub fn from_name(name: &str) -> Option<View> {
        match name.to_ascii_lowercase().as_str() {
            "home" | "dashboard" => Some(View::Home),
            "tasks" => Some(View::Tasks),
            "notes" => Some(View::Notes),
            "focus" => Some(View::Focus),
            _ => None,
        }
    }
}

impl Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label().to_ascii_lowercase())
    }
}

/// Which view is on screen. Holds nothing else; switching views never touches application
/// state.
#[derive(Debug, Default)]
pub struct Router {
    current: View,
}

impl Router {
    pub fn new(initial: View) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> View {
        self.current
    }

    /// Returns whether the view actually changed.
    pub fn select(&mut self, view: View) -> bool {
        let changed = self.current != view;
        self.current = view;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::{Router, View};

    #[test]
    fn test_router_select() {
        let mut router = Router::default();
        assert_eq!(router.current(), View::Home);

        assert!(router.select(View::Focus));
        assert!(!router.select(View::Focus));
        assert_eq!(router.current(), View::Focus);
    }

    #[test]
    fn test_view_names() {
        assert_eq!(View::from_name("Dashboard"), Some(View::Home));
        assert_eq!(View::from_name("NOTES"), Some(View::Notes));
        assert_eq!(View::from_name("settings"), None);
        for view in View::ALL {
            assert_eq!(View::from_name(&view.to_string()), Some(view));
        }
    }
}
