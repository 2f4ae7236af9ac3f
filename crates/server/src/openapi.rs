use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct AppointmentDoc {
    pub id: i32,
    pub patient: String,
    pub practitioner: String,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM:SS
    pub time: String,
    /// scheduled | cancelled | completed
    pub status: String,
}

#[derive(ToSchema)]
pub struct CreateAppointmentDoc {
    pub patient: String,
    pub practitioner: String,
    pub date: String,
    pub time: String,
    pub status: String,
}

#[derive(ToSchema)]
pub struct UpdateAppointmentDoc {
    pub patient: Option<String>,
    pub practitioner: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub status: Option<String>,
}

#[derive(ToSchema)]
pub struct CreatedDoc { pub message: String, pub id: i32 }

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(ToSchema)]
pub struct ErrorDoc { pub error: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::appointments::list,
        crate::routes::appointments::create,
        crate::routes::appointments::update,
        crate::routes::appointments::delete,
    ),
    components(
        schemas(
            HealthResponse,
            AppointmentDoc,
            CreateAppointmentDoc,
            UpdateAppointmentDoc,
            CreatedDoc,
            MessageDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "agenda", description = "Appointment booking"),
    )
)]
pub struct ApiDoc;
