use actix_web::{get, HttpResponse};

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Landing page with the summarize form
#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_index_serves_form() {
        let app = test::init_service(App::new().service(index)).await;
        let req = test::TestRequest::get().uri("/").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let html = std::str::from_utf8(&body).unwrap();
        assert!(html.contains("action=\"/summarize\""));
    }
}
