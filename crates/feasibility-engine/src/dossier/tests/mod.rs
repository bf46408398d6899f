mod common;

mod charges;
mod routing;
