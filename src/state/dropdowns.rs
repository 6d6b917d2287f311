//! Open/closed state of the navigation bar dropdowns.

#[cfg(test)]
#[path = "dropdowns_test.rs"]
mod dropdowns_test;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dropdown {
    Search,
    Connections,
    Messages,
    User,
}

impl Dropdown {
    pub const ALL: [Self; 4] = [Self::Search, Self::Connections, Self::Messages, Self::User];

    fn bit(self) -> u8 {
        match self {
            Self::Search => 1,
            Self::Connections => 1 << 1,
            Self::Messages => 1 << 2,
            Self::User => 1 << 3,
        }
    }
}

/// Each dropdown toggles independently; several may be open at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dropdowns {
    open: u8,
}

impl Dropdowns {
    #[must_use]
    pub fn is_open(self, dropdown: Dropdown) -> bool {
        self.open & dropdown.bit() != 0
    }

    /// Flip one dropdown; returns whether it is now open.
    pub fn toggle(&mut self, dropdown: Dropdown) -> bool {
        self.open ^= dropdown.bit();
        self.is_open(dropdown)
    }

    pub fn open(&mut self, dropdown: Dropdown) {
        self.open |= dropdown.bit();
    }

    pub fn close(&mut self, dropdown: Dropdown) {
        self.open &= !dropdown.bit();
    }

    /// Handle a click. `inside` names the dropdown region containing the
    /// click target, if any; every other open dropdown closes.
    pub fn dismiss_outside(&mut self, inside: Option<Dropdown>) {
        let keep = inside.map_or(0, Dropdown::bit);
        self.open &= keep;
    }

    #[must_use]
    pub fn open_dropdowns(self) -> Vec<Dropdown> {
        Dropdown::ALL.into_iter().filter(|d| self.is_open(*d)).collect()
    }
}
