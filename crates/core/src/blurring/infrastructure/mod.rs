pub mod blurrer_factory;
pub mod cpu_rectangular_blurrer;
