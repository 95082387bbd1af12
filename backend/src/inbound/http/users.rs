//! User API handlers.
//!
//! ```text
//! POST  /api/v1/users                  register (idempotent by email)
//! GET   /api/v1/users                  list all users
//! GET   /api/v1/users/admin/{email}    admin role flag
//! GET   /api/v1/users/blocked/{email}  blocked status flag
//! PATCH /api/v1/users/admin/{id}       overwrite role
//! PATCH /api/v1/users/{id}             overwrite status
//! ```

use actix_web::{get, patch, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::domain::{AccountStatus, NewRegistration, User, UserRole};
use crate::inbound::http::ApiResult;
use crate::inbound::http::acks::{RegisterAck, UpdateAck};
use crate::inbound::http::state::HttpState;

/// Registration request body.
///
/// Role and status submitted by a client are ignored; the backend forces
/// them to `user`/`active`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Registration email, the unique key.
    pub email: String,
    /// Avatar reference; clients send the legacy wire name `photoURL`.
    #[serde(rename = "photoURL", default)]
    pub photo_url: Option<String>,
    /// Blood group.
    #[serde(default)]
    pub blood_group: Option<String>,
    /// Home district.
    #[serde(default)]
    pub district: Option<String>,
    /// Home upazilla.
    #[serde(default)]
    pub upazilla: Option<String>,
}

impl From<RegisterRequest> for NewRegistration {
    fn from(value: RegisterRequest) -> Self {
        Self {
            email: value.email,
            name: value.name,
            photo_url: value.photo_url,
            blood_group: value.blood_group,
            district: value.district,
            upazilla: value.upazilla,
        }
    }
}

/// Role overwrite body for `PATCH /api/v1/users/admin/{id}`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RoleBody {
    /// New role value; any string is accepted.
    pub role: String,
}

/// Status overwrite body for `PATCH /api/v1/users/{id}`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct StatusBody {
    /// New status value; any string is accepted.
    pub status: String,
}

/// Admin flag payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AdminFlag {
    /// Whether the user holds the admin role.
    pub admin: bool,
}

/// Blocked flag payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BlockedFlag {
    /// Whether the account is suspended.
    pub blocked: bool,
}

/// Register a user, or do nothing when the email already exists.
///
/// The duplicate case is a 200 with `insertedId: null`, not an error: the
/// frontend registers on every social login.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered or already present", body = RegisterAck),
        (status = 503, description = "Store unavailable", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "registerUser"
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<RegisterAck>> {
    let registration = NewRegistration::from(payload.into_inner());
    let email = registration.email.clone();
    let inserted_id = state.users.register(registration).await?;
    let ack = match inserted_id {
        Some(id) => {
            info!(%email, user_id = %id, "user registered");
            RegisterAck {
                message: "User created".to_owned(),
                inserted_id: Some(id),
            }
        }
        None => RegisterAck {
            message: "User already exists".to_owned(),
            inserted_id: None,
        },
    };
    Ok(web::Json(ack))
}

/// List every registered user.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "All users", body = [User]),
        (status = 503, description = "Store unavailable", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<User>>> {
    Ok(web::Json(state.users.list().await?))
}

/// Whether the user behind the given email holds the admin role.
///
/// A missing user is `admin: false`, not an error.
#[utoipa::path(
    get,
    path = "/api/v1/users/admin/{email}",
    responses((status = 200, description = "Admin flag", body = AdminFlag)),
    params(("email" = String, Path, description = "Registration email")),
    tags = ["users"],
    operation_id = "adminFlag"
)]
#[get("/users/admin/{email}")]
pub async fn admin_flag(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<AdminFlag>> {
    let user = state.users.find_by_email(&path.into_inner()).await?;
    let admin = user.is_some_and(|u| u.role.is_admin());
    Ok(web::Json(AdminFlag { admin }))
}

/// Whether the account behind the given email is blocked.
#[utoipa::path(
    get,
    path = "/api/v1/users/blocked/{email}",
    responses((status = 200, description = "Blocked flag", body = BlockedFlag)),
    params(("email" = String, Path, description = "Registration email")),
    tags = ["users"],
    operation_id = "blockedFlag"
)]
#[get("/users/blocked/{email}")]
pub async fn blocked_flag(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<BlockedFlag>> {
    let user = state.users.find_by_email(&path.into_inner()).await?;
    let blocked = user.is_some_and(|u| u.status.is_blocked());
    Ok(web::Json(BlockedFlag { blocked }))
}

/// Overwrite a user's role. No transition rules are enforced; any string is
/// accepted.
#[utoipa::path(
    patch,
    path = "/api/v1/users/admin/{id}",
    request_body = RoleBody,
    responses((status = 200, description = "Update acknowledgement", body = UpdateAck)),
    params(("id" = Uuid, Path, description = "User id")),
    tags = ["users"],
    operation_id = "setUserRole"
)]
#[patch("/users/admin/{id}")]
pub async fn set_role(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    payload: web::Json<RoleBody>,
) -> ApiResult<web::Json<UpdateAck>> {
    let id = path.into_inner();
    let role = UserRole::new(payload.into_inner().role);
    info!(user_id = %id, role = %role, "role overwrite");
    let affected = state.users.set_role(id, role).await?;
    Ok(web::Json(UpdateAck::from_affected(affected)))
}

/// Overwrite a user's status. Any string is accepted.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    request_body = StatusBody,
    responses((status = 200, description = "Update acknowledgement", body = UpdateAck)),
    params(("id" = Uuid, Path, description = "User id")),
    tags = ["users"],
    operation_id = "setUserStatus"
)]
#[patch("/users/{id}")]
pub async fn set_status(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    payload: web::Json<StatusBody>,
) -> ApiResult<web::Json<UpdateAck>> {
    let id = path.into_inner();
    let status = AccountStatus::new(payload.into_inner().status);
    info!(user_id = %id, status = %status, "status overwrite");
    let affected = state.users.set_status(id, status).await?;
    Ok(web::Json(UpdateAck::from_affected(affected)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockBookingRepository, MockReservationCommand, MockTestCatalogRepository,
        MockUserRepository,
    };
    use crate::domain::{AccountStatus, SlotOrdering, UserRole};
    use actix_web::{App, test as actix_test};
    use chrono::Utc;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn state_with_users(users: MockUserRepository) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            users: Arc::new(users),
            catalog: Arc::new(MockTestCatalogRepository::new()),
            bookings: Arc::new(MockBookingRepository::new()),
            reservation: Arc::new(MockReservationCommand::new()),
            featured_order: SlotOrdering::default(),
        })
    }

    fn sample_user(role: &str, status: &str) -> crate::domain::User {
        crate::domain::User {
            id: Uuid::new_v4(),
            email: "a@x.com".to_owned(),
            name: "Ada".to_owned(),
            photo_url: None,
            blood_group: None,
            district: None,
            upazilla: None,
            role: UserRole::new(role),
            status: AccountStatus::new(status),
            created_at: Utc::now(),
        }
    }

    async fn call(
        state: web::Data<HttpState>,
        req: actix_test::TestRequest,
    ) -> actix_web::dev::ServiceResponse {
        let app = actix_test::init_service(
            App::new().app_data(state).service(
                web::scope("/api/v1")
                    .service(register)
                    .service(list_users)
                    .service(admin_flag)
                    .service(blocked_flag)
                    .service(set_role)
                    .service(set_status),
            ),
        )
        .await;
        actix_test::call_service(&app, req.to_request()).await
    }

    #[actix_web::test]
    async fn register_reports_inserted_id() {
        let id = Uuid::new_v4();
        let mut users = MockUserRepository::new();
        users
            .expect_register()
            .times(1)
            .return_once(move |_| Ok(Some(id)));

        let res = call(
            state_with_users(users),
            actix_test::TestRequest::post()
                .uri("/api/v1/users")
                .set_json(json!({ "name": "Ada", "email": "a@x.com" })),
        )
        .await;
        assert!(res.status().is_success());
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["message"], "User created");
        assert_eq!(body["insertedId"], id.to_string());
    }

    #[actix_web::test]
    async fn register_is_idempotent_for_known_email() {
        let mut users = MockUserRepository::new();
        users.expect_register().times(1).return_once(|_| Ok(None));

        let res = call(
            state_with_users(users),
            actix_test::TestRequest::post()
                .uri("/api/v1/users")
                .set_json(json!({ "name": "Ada", "email": "a@x.com" })),
        )
        .await;
        assert!(res.status().is_success());
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["message"], "User already exists");
        assert_eq!(body["insertedId"], Value::Null);
    }

    #[actix_web::test]
    async fn admin_flag_reflects_role() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .times(1)
            .return_once(|_| Ok(Some(sample_user("admin", "active"))));

        let res = call(
            state_with_users(users),
            actix_test::TestRequest::get().uri("/api/v1/users/admin/a@x.com"),
        )
        .await;
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["admin"], true);
    }

    #[actix_web::test]
    async fn admin_flag_is_false_for_unknown_user() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .times(1)
            .return_once(|_| Ok(None));

        let res = call(
            state_with_users(users),
            actix_test::TestRequest::get().uri("/api/v1/users/admin/missing@x.com"),
        )
        .await;
        assert!(res.status().is_success());
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["admin"], false);
    }

    #[actix_web::test]
    async fn blocked_flag_uses_block_spelling() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .times(1)
            .return_once(|_| Ok(Some(sample_user("user", "block"))));

        let res = call(
            state_with_users(users),
            actix_test::TestRequest::get().uri("/api/v1/users/blocked/a@x.com"),
        )
        .await;
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["blocked"], true);
    }

    #[actix_web::test]
    async fn set_role_routes_before_status_patch() {
        let id = Uuid::new_v4();
        let mut users = MockUserRepository::new();
        users
            .expect_set_role()
            .times(1)
            .withf(|_, role| role.as_str() == "admin")
            .return_once(|_, _| Ok(1));

        let res = call(
            state_with_users(users),
            actix_test::TestRequest::patch()
                .uri(&format!("/api/v1/users/admin/{id}"))
                .set_json(json!({ "role": "admin" })),
        )
        .await;
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["matchedCount"], 1);
        assert_eq!(body["modifiedCount"], 1);
    }

    #[actix_web::test]
    async fn set_status_accepts_arbitrary_strings() {
        let id = Uuid::new_v4();
        let mut users = MockUserRepository::new();
        users
            .expect_set_status()
            .times(1)
            .withf(|_, status| status.as_str() == "on-hold")
            .return_once(|_, _| Ok(1));

        let res = call(
            state_with_users(users),
            actix_test::TestRequest::patch()
                .uri(&format!("/api/v1/users/{id}"))
                .set_json(json!({ "status": "on-hold" })),
        )
        .await;
        assert!(res.status().is_success());
    }
}
