// Kernel test modules
#[cfg(test)]
mod support;
#[cfg(test)]
mod component_tests;
#[cfg(test)]
mod signals_tests;
