use serde::{Deserialize, Serialize};

/// A 2D bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl Bounds {
    pub(crate) fn from_xy(x: f64, y: f64) -> Self {
        Self {
            minx: x,
            miny: y,
            maxx: x,
            maxy: y,
        }
    }

    /// The smallest box covering both boxes.
    pub fn merge(self, other: Bounds) -> Bounds {
        Bounds {
            minx: self.minx.min(other.minx),
            miny: self.miny.min(other.miny),
            maxx: self.maxx.max(other.maxx),
            maxy: self.maxy.max(other.maxy),
        }
    }

    /// Fold many optional boxes into one, `None` when all are empty.
    pub(crate) fn union_all(bounds: impl IntoIterator<Item = Option<Bounds>>) -> Option<Bounds> {
        bounds
            .into_iter()
            .flatten()
            .reduce(|acc, bounds| acc.merge(bounds))
    }
}

impl From<Bounds> for [f64; 4] {
    fn from(value: Bounds) -> Self {
        [value.minx, value.miny, value.maxx, value.maxy]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn union() {
        let merged = Bounds::union_all([
            Some(Bounds::from_xy(1., 5.)),
            None,
            Some(Bounds::from_xy(-2., 3.)),
        ])
        .unwrap();
        assert_eq!(<[f64; 4]>::from(merged), [-2., 3., 1., 5.]);
        assert_eq!(Bounds::union_all([None, None]), None);
    }
}
