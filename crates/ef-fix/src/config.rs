use ef_core::Borders;
use serde::{Deserialize, Serialize};

use crate::format::PlaneKind;

/// Border counts and fit radius shared by both fixers.
///
/// `radius == 0` fits one model per line; otherwise each sample uses the
/// `2 * radius + 1` samples around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FixConfig {
    pub luma: Borders,
    pub chroma: Borders,
    pub radius: usize,
}

impl FixConfig {
    /// Borders applied to `plane`. RGB planes use the luma set.
    pub fn borders_for(&self, plane: PlaneKind) -> Borders {
        if plane.is_chroma() {
            self.chroma
        } else {
            self.luma
        }
    }
}

#[cfg(test)]
mod tests {
    use ef_core::Borders;

    use super::FixConfig;
    use crate::format::PlaneKind;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: FixConfig =
            serde_json::from_str(r#"{ "luma": { "top": 2, "left": 1 }, "radius": 4 }"#)
                .expect("valid config");
        assert_eq!(cfg.luma, Borders::new(1, 2, 0, 0));
        assert!(cfg.chroma.is_empty());
        assert_eq!(cfg.radius, 4);
    }

    #[test]
    fn chroma_planes_pick_chroma_borders() {
        let cfg = FixConfig {
            luma: Borders::new(1, 1, 1, 1),
            chroma: Borders::new(2, 0, 0, 0),
            radius: 0,
        };
        assert_eq!(cfg.borders_for(PlaneKind::Y), cfg.luma);
        assert_eq!(cfg.borders_for(PlaneKind::G), cfg.luma);
        assert_eq!(cfg.borders_for(PlaneKind::V), cfg.chroma);
    }
}
