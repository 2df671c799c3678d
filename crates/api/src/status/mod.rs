use crate::job_schedulers::DueJobScheduler;
use actix_web::{web, HttpResponse};
use notifier_api_structs::get_service_health::*;

async fn status(due_job: web::Data<DueJobScheduler>) -> HttpResponse {
    HttpResponse::Ok().json(APIResponse {
        message: "Notifier is up and delivering reminders".into(),
        due_job_running: due_job.is_running(),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(status));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::{call_and_read_body_json, init_service, TestRequest};
    use actix_web::App;
    use notifier_infra::NotifierContext;

    #[actix_web::main]
    #[test]
    async fn responds_with_health_message() {
        let due_job = web::Data::new(DueJobScheduler::new());
        let app = init_service(
            App::new()
                .app_data(due_job.clone())
                .configure(configure_routes),
        )
        .await;
        let req = TestRequest::get().uri("/").to_request();
        let res: APIResponse = call_and_read_body_json(&app, req).await;
        assert!(res.message.contains("up"));
        assert!(!res.due_job_running);

        let mut ctx = NotifierContext::create_inmemory();
        ctx.config.poll_interval_secs = 60;
        assert!(due_job.start(ctx));
        let req = TestRequest::get().uri("/").to_request();
        let res: APIResponse = call_and_read_body_json(&app, req).await;
        assert!(res.due_job_running);
        assert!(due_job.stop());
    }
}
