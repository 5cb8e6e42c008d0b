pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::login)
            .service(auth::register)
            .service(auth::me),
    )
    .service(
        web::scope("/tasks")
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            // Literal segments are registered ahead of the `{id}` matcher so
            // "staff", "assigned/..." and friends are not captured as ids.
            .service(tasks::get_tasks_by_assignee)
            .service(tasks::get_tasks_by_creator)
            .service(tasks::get_overdue_tasks)
            .service(tasks::get_task_stats)
            .service(tasks::get_staff_members)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    )
    .service(
        web::scope("/users")
            .service(users::get_users)
            .service(users::create_user)
            .service(users::update_user)
            .service(users::delete_user),
    );
}
