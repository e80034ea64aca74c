pub mod visit_service;

pub use visit_service::VisitService;
