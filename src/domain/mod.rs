// Domain layer - status report records, session identity, widgets, navigation
pub mod dashboard;
pub mod insights;
pub mod navigation;
pub mod session;
pub mod widget;
