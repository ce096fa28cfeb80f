//! End-to-end flows across the session, task, staff and invitation services.

mod helpers;

mod invitation_test;
mod session_test;
mod staff_test;
mod task_test;
