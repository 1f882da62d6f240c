use crate::geometry::{Dimension, LineString};

pub(crate) fn ls0() -> LineString {
    LineString::try_new(&[[0., 0.], [1., 1.]], Dimension::XY, None).unwrap()
}

pub(crate) fn ls_zm() -> LineString {
    LineString::try_new(&[[0., 0., 1., 2.], [1., 1., 3., 4.]], Dimension::XY, None).unwrap()
}
