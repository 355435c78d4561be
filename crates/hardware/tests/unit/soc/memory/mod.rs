//! Tests for region storage and the region composer.
