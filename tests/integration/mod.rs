//! Integration tests for strategy selection

mod manager_routing;
mod test_utils;
mod validation_boundary;
