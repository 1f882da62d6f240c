pub(crate) mod linestring;
