pub mod dispatcher;

pub use dispatcher::NotificationDispatcherService;
