//! Shared fixtures for in-crate tests.


pub(crate) use memory::InMemoryEventRepository;
