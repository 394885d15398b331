mod host;
mod locator;
mod map_builder;
mod synthetic_access;
