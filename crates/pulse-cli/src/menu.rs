//! The numbered action menu.
//!
//! Built once at startup from an explicit ordered list and validated, so
//! every id shown to the operator has a label and an action.

use thiserror::Error;

/// Something the shell can do. Each variant is handled exhaustively by
/// [`crate::shell::Shell::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddEndpoint,
    ListEndpoints,
    TestAll,
    RemoveEndpoint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub id: u32,
    pub label: &'static str,
    pub action: Action,
}

impl MenuOption {
    pub const fn new(id: u32, label: &'static str, action: Action) -> Self {
        Self { id, label, action }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MenuError {
    #[error("menu option {0} is declared more than once")]
    DuplicateId(u32),

    #[error("menu option {0} has no label")]
    EmptyLabel(u32),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("option {0} does not exist")]
    InvalidSelection(u32),
}

#[derive(Debug, Clone)]
pub struct Menu {
    options: Vec<MenuOption>,
}

impl Menu {
    pub fn new(options: Vec<MenuOption>) -> Result<Self, MenuError> {
        for (i, option) in options.iter().enumerate() {
            if option.label.trim().is_empty() {
                return Err(MenuError::EmptyLabel(option.id));
            }
            if options[..i].iter().any(|o| o.id == option.id) {
                return Err(MenuError::DuplicateId(option.id));
            }
        }
        Ok(Self { options })
    }

    /// 1=Add, 2=List, 3=Test All, 4=Remove.
    pub fn standard() -> Result<Self, MenuError> {
        Self::new(vec![
            MenuOption::new(1, "Add endpoint", Action::AddEndpoint),
            MenuOption::new(2, "List endpoints", Action::ListEndpoints),
            MenuOption::new(3, "Test All", Action::TestAll),
            MenuOption::new(4, "Remove endpoint", Action::RemoveEndpoint),
        ])
    }

    pub fn options(&self) -> &[MenuOption] {
        &self.options
    }

    pub fn select(&self, id: u32) -> Result<Action, DispatchError> {
        self.options
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.action)
            .ok_or(DispatchError::InvalidSelection(id))
    }
}
