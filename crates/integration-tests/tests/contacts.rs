//! Contact panel and the admin contact form.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use vadaf_integration_tests::TestApp;

#[tokio::test]
async fn test_contact_panel_shows_defaults() {
    let mut app = TestApp::new();

    let home = app.get("/").await;

    assert_eq!(home.status, StatusCode::OK);
    assert!(home.body.contains("+34 643064075"));
    assert!(home.body.contains("href=\"https://wa.me/34643064075\""));
    assert!(home.body.contains("href=\"mailto:servicioalclientevadaf@gmail.com\""));
    assert!(home.body.contains(">www.instagram.com/joyeria_vadaf?igsh=ZjN4ZHdqdmFxdjVp<"));
}

#[tokio::test]
async fn test_saved_contacts_appear_everywhere() {
    let mut app = TestApp::new();
    app.login().await;

    let response = app
        .post_form(
            "/admin/contacts",
            "phone=%2B34%20600%20111%20222&whatsapp=https%3A%2F%2Fwa.me%2F34600111222&instagram=&email=",
        )
        .await;
    assert_eq!(
        response.location(),
        Some("/admin?success=Contactos%20guardados.")
    );

    let fragment = app.new_visitor().get("/fragments/contacts").await;
    assert!(fragment.body.contains("+34 600 111 222"));
    assert!(fragment.body.contains("href=\"https://wa.me/34600111222\""));
    // Blank fields fall back to the defaults
    assert!(fragment.body.contains("servicioalclientevadaf@gmail.com"));

    let form = app.get("/admin/fragments/contacts").await;
    assert!(form.body.contains("value=\"+34 600 111 222\""));
}

#[tokio::test]
async fn test_restore_defaults() {
    let mut app = TestApp::new();
    app.login().await;
    app.post_form("/admin/contacts", "phone=123").await;

    let response = app.post_form("/admin/contacts/defaults", "").await;
    assert_eq!(
        response.location(),
        Some("/admin?success=Valores%20predeterminados%20cargados.")
    );

    let fragment = app.get("/fragments/contacts").await;
    assert!(fragment.body.contains("+34 643064075"));
    assert!(!fragment.body.contains(">123<"));
}
