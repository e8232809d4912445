pub mod billiard;
pub mod bohr;
pub mod debroglie;
pub mod metastable;
pub mod model;
pub mod plum_pudding;
pub mod quantized;
pub mod schrodinger;
pub mod solar_system;
