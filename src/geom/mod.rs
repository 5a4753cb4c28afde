pub mod ellipsoid;
