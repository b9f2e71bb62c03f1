// Navigation - Exactly one section is visible at a time
use crate::application::ports::DisplaySurface;
use crate::domain::dashboard::Section;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct Navigator {
    active: Section,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            active: Section::Home,
        }
    }
}

impl Navigator {
    #[cfg(test)]
    pub fn is_visible(&self, section: Section) -> bool {
        self.active == section
    }

    pub fn show(&mut self, section: Section, surface: &mut dyn DisplaySurface) {
        debug!(from = %self.active, to = %section, "Showing section");
        self.active = section;
        surface.show_section(section);
    }
}
