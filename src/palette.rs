use crate::color::HexColor;
use crate::event::{EventBus, PaletteColors};

/// Default colors plus a most-recently-used ring of custom picks.
///
/// The ring has the same capacity as the default list.
#[derive(Debug)]
pub struct Palette {
    defaults: Vec<HexColor>,
    custom: Vec<Option<HexColor>>,
    colors_changed: EventBus<PaletteColors>,
}

impl Palette {
    /// Returns `None` if `defaults` is empty.
    pub fn new(defaults: Vec<HexColor>) -> Option<Self> {
        if defaults.is_empty() {
            return None;
        }

        let custom = vec![None; defaults.len()];
        Some(Self {
            defaults,
            custom,
            colors_changed: EventBus::new(),
        })
    }

    pub fn defaults(&self) -> &[HexColor] {
        &self.defaults
    }

    pub fn custom(&self) -> &[Option<HexColor>] {
        &self.custom
    }

    pub fn capacity(&self) -> usize {
        self.defaults.len()
    }

    pub fn colors(&self) -> PaletteColors {
        PaletteColors {
            defaults: self.defaults.clone(),
            custom: self.custom.clone(),
        }
    }

    /// Records a custom color at the front of the ring, evicting the oldest.
    /// Colors already in the ring are left where they are.
    pub fn add_color(&mut self, color: HexColor) {
        if self.custom.contains(&Some(color)) {
            return;
        }

        self.custom.pop();
        self.custom.insert(0, Some(color));
        self.notify();
    }

    pub fn reset(&mut self) {
        self.custom.iter_mut().for_each(|slot| *slot = None);
        self.notify();
    }

    /// Restores a persisted ring. Extra entries are dropped and missing ones
    /// are left empty.
    pub fn restore_custom(&mut self, custom: &[Option<HexColor>]) {
        let capacity = self.capacity();
        self.custom = custom
            .iter()
            .copied()
            .chain(std::iter::repeat(None))
            .take(capacity)
            .collect();
        self.notify();
    }

    pub fn colors_changed(&self) -> &EventBus<PaletteColors> {
        &self.colors_changed
    }

    fn notify(&self) {
        self.colors_changed.emit(&self.colors());
    }
}
