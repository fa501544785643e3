use crate::{
    api::{attendance, employee, recalc, regularization, reports},
    config::Config,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(web::resource("/{id}").route(web::get().to(employee::get_employee)))
                    // /employees/{id}/shift
                    .service(
                        web::resource("/{id}/shift").route(web::put().to(employee::assign_shift)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(web::resource("").route(web::get().to(attendance::list_attendance)))
                    // /attendance/check-in
                    .service(
                        web::resource("/check-in").route(web::post().to(attendance::check_in)),
                    )
                    // /attendance/check-out
                    .service(
                        web::resource("/check-out").route(web::post().to(attendance::check_out)),
                    )
                    // /attendance/recalculate
                    .service(
                        web::resource("/recalculate").route(web::post().to(recalc::recalculate)),
                    ),
            )
            .service(
                web::scope("/regularizations")
                    // /regularizations
                    .service(
                        web::resource("")
                            .route(web::post().to(regularization::create_regularization))
                            .route(web::get().to(regularization::list_regularizations)),
                    )
                    // /regularizations/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(regularization::approve_regularization)),
                    )
                    // /regularizations/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(regularization::reject_regularization)),
                    ),
            )
            .service(
                web::scope("/reports")
                    .service(web::resource("/daily").route(web::get().to(reports::daily)))
                    .service(web::resource("/monthly").route(web::get().to(reports::monthly)))
                    .service(
                        web::resource("/late-arrivals")
                            .route(web::get().to(reports::late_arrivals)),
                    )
                    .service(
                        web::resource("/leave-balance")
                            .route(web::get().to(reports::leave_balance)),
                    )
                    .service(web::resource("/tenure").route(web::get().to(reports::tenure))),
            ),
    );
}
