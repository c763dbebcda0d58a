//! Start screen menu: start, background picker, sound switch, quit

use crate::background::Background;

/// Menu state
#[derive(Debug, Clone)]
pub struct Menu {
    pub selected: usize,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone)]
pub struct MenuItem {
    pub label: String,
    pub item_type: MenuItemType,
}

#[derive(Debug, Clone)]
pub enum MenuItemType {
    /// Simple button that triggers an action
    Button(MenuAction),
    /// Sound on/off
    SoundToggle { value: bool },
    /// Cycle through the backgrounds
    BackgroundCycle { current: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    StartGame,
    Quit,
}

/// A preference changed from the menu, for the caller to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChange {
    Background(Background),
    Sound(bool),
}

impl Menu {
    pub fn new(background: Background, sound_on: bool) -> Self {
        let current = Background::all()
            .iter()
            .position(|&bg| bg == background)
            .unwrap_or(0);

        Self {
            selected: 0,
            items: vec![
                MenuItem {
                    label: "Start".to_string(),
                    item_type: MenuItemType::Button(MenuAction::StartGame),
                },
                MenuItem {
                    label: "Background".to_string(),
                    item_type: MenuItemType::BackgroundCycle { current },
                },
                MenuItem {
                    label: "Sound".to_string(),
                    item_type: MenuItemType::SoundToggle { value: sound_on },
                },
                MenuItem {
                    label: "Quit".to_string(),
                    item_type: MenuItemType::Button(MenuAction::Quit),
                },
            ],
        }
    }

    pub fn move_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len().saturating_sub(1);
        }
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        } else {
            self.selected = 0;
        }
    }

    pub fn adjust_left(&mut self) -> Option<MenuChange> {
        self.adjust(-1)
    }

    pub fn adjust_right(&mut self) -> Option<MenuChange> {
        self.adjust(1)
    }

    fn adjust(&mut self, step: isize) -> Option<MenuChange> {
        let item = self.items.get_mut(self.selected)?;
        match &mut item.item_type {
            MenuItemType::SoundToggle { value } => {
                *value = !*value;
                Some(MenuChange::Sound(*value))
            }
            MenuItemType::BackgroundCycle { current } => {
                let len = Background::all().len() as isize;
                *current = (*current as isize + step).rem_euclid(len) as usize;
                Some(MenuChange::Background(Background::all()[*current]))
            }
            MenuItemType::Button(_) => None,
        }
    }

    /// Enter on the selected item: buttons return their action,
    /// settings items step forward as if Right was pressed
    pub fn activate(&mut self) -> (Option<MenuAction>, Option<MenuChange>) {
        let action = match self.items.get(self.selected) {
            Some(MenuItem {
                item_type: MenuItemType::Button(action),
                ..
            }) => *action,
            Some(_) => return (None, self.adjust_right()),
            None => return (None, None),
        };
        (Some(action), None)
    }

    /// Keep the sound item in step with toggles made outside the menu
    pub fn sync_sound(&mut self, sound_on: bool) {
        for item in &mut self.items {
            if let MenuItemType::SoundToggle { value } = &mut item.item_type {
                *value = sound_on;
            }
        }
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new(Background::None, false)
    }
}
