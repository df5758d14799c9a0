pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use axum::{
    http::{header, HeaderValue, Method, Request},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Router,
};
use service_core::middleware::{
    rate_limit::{ip_rate_limit_middleware, IpRateLimiter},
    tracing::request_id_middleware,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{openapi::security::SecurityScheme, Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::FitnessConfig;
use crate::handlers::{
    ai_content, goals, health, insights, medical, nutrition, templates, usage, users, workouts,
};
use crate::middleware::metrics_middleware;
use crate::services::{ContentService, Database, UsageAggregator};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness,
        health::api_root,
        users::register,
        users::login,
        users::logout,
        users::get_profile,
        users::update_profile,
        users::get_profile_details,
        users::update_profile_details,
        users::update_fitness_goals,
        users::dashboard,
        users::user_stats,
        users::health_insights,
        goals::list_goals,
        goals::create_goal,
        goals::get_goal,
        goals::update_goal,
        goals::delete_goal,
        medical::list_records,
        medical::create_record,
        medical::get_record,
        medical::update_record,
        medical::delete_record,
        workouts::list_exercises,
        workouts::list_workouts,
        workouts::create_workout,
        workouts::get_workout,
        workouts::update_workout,
        workouts::delete_workout,
        workouts::start_workout,
        workouts::complete_workout,
        workouts::today,
        workouts::stats,
        workouts::history,
        templates::list_templates,
        templates::create_template,
        templates::get_template,
        templates::update_template,
        templates::delete_template,
        ai_content::list_requests,
        ai_content::get_request,
        ai_content::submit_feedback,
        ai_content::generate_workout,
        ai_content::generate_nutrition,
        ai_content::analyze_health,
        nutrition::list_plans,
        nutrition::get_plan,
        nutrition::update_plan,
        nutrition::delete_plan,
        insights::list_insights,
        insights::get_insight,
        insights::update_insight,
        usage::usage_stats,
        usage::daily_usage,
    ),
    components(
        schemas(
            dtos::ErrorResponse,
            dtos::MessageResponse,
            dtos::users::RegisterRequest,
            dtos::users::RegisterResponse,
            dtos::users::LoginRequest,
            dtos::users::LoginResponse,
            dtos::users::FitnessGoalsRequest,
            dtos::users::DashboardResponse,
            dtos::users::UserStatsResponse,
            dtos::users::HealthTip,
            dtos::users::HealthTipsResponse,
            dtos::workouts::TodayResponse,
            dtos::workouts::HistorySummary,
            dtos::workouts::HistoryResponse,
            dtos::ai::GenerateWorkoutRequest,
            dtos::ai::GenerateNutritionRequest,
            dtos::ai::AnalyzeHealthRequest,
            dtos::ai::BudgetLevel,
            dtos::ai::CookingTime,
            dtos::ai::FeedbackRequest,
            dtos::ai::FeedbackResponse,
            dtos::ai::GenerationResponse,
            dtos::ai::DailyUsageResponse,
            models::SanitizedUser,
            models::UpdateUser,
            models::Gender,
            models::FitnessLevel,
            models::ActivityLevel,
            models::ProfileVisibility,
            models::UserProfile,
            models::UpdateUserProfile,
            models::WorkoutGoal,
            models::GoalType,
            models::CreateWorkoutGoal,
            models::UpdateWorkoutGoal,
            models::MedicalRecord,
            models::CreateMedicalRecord,
            models::Exercise,
            models::WorkoutTemplate,
            models::CreateWorkoutTemplate,
            models::UpdateWorkoutTemplate,
            models::Workout,
            models::WorkoutType,
            models::WorkoutStatus,
            models::Difficulty,
            models::CreateWorkout,
            models::UpdateWorkout,
            models::CompleteWorkout,
            models::WorkoutStats,
            models::ContentRequest,
            models::ContentType,
            models::ContentStatus,
            models::NutritionPlan,
            models::UpdateNutritionPlan,
            models::HealthInsight,
            models::InsightType,
            models::InsightPriority,
            models::UpdateHealthInsight,
            models::UsageStat,
            models::UsageSummary,
            models::RequestBreakdown,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Registration, login and profile management"),
        (name = "Goals", description = "Workout goals"),
        (name = "Medical", description = "Vitals records"),
        (name = "Workouts", description = "Exercise catalogue, templates and workout lifecycle"),
        (name = "AI", description = "Generated workouts, nutrition plans and health insights"),
        (name = "Observability", description = "Service health and monitoring"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .build(),
                ),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: FitnessConfig,
    pub db: Database,
    pub content: ContentService,
    pub usage: UsageAggregator,
    pub login_rate_limiter: IpRateLimiter,
    pub register_rate_limiter: IpRateLimiter,
}

pub fn build_router(state: AppState) -> Router {
    let login_route = Router::new()
        .route("/api/users/login", post(users::login))
        .layer(from_fn_with_state(
            state.login_rate_limiter.clone(),
            ip_rate_limit_middleware,
        ));

    let register_route = Router::new()
        .route("/api/users/register", post(users::register))
        .layer(from_fn_with_state(
            state.register_rate_limiter.clone(),
            ip_rate_limit_middleware,
        ));

    let user_routes = Router::new()
        .route("/api/users/logout", post(users::logout))
        .route(
            "/api/users/profile",
            get(users::get_profile).patch(users::update_profile),
        )
        .route(
            "/api/users/profile/details",
            get(users::get_profile_details).patch(users::update_profile_details),
        )
        .route("/api/users/fitness-goals", put(users::update_fitness_goals))
        .route("/api/users/dashboard", get(users::dashboard))
        .route("/api/users/stats", get(users::user_stats))
        .route("/api/users/health-insights", get(users::health_insights))
        .route(
            "/api/users/goals",
            get(goals::list_goals).post(goals::create_goal),
        )
        .route(
            "/api/users/goals/:id",
            get(goals::get_goal)
                .patch(goals::update_goal)
                .delete(goals::delete_goal),
        )
        .route(
            "/api/users/medical",
            get(medical::list_records).post(medical::create_record),
        )
        .route(
            "/api/users/medical/:id",
            get(medical::get_record)
                .patch(medical::update_record)
                .delete(medical::delete_record),
        );

    let workout_routes = Router::new()
        .route("/api/workouts/exercises", get(workouts::list_exercises))
        .route(
            "/api/workouts/templates",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/api/workouts/templates/:id",
            get(templates::get_template)
                .patch(templates::update_template)
                .delete(templates::delete_template),
        )
        .route("/api/workouts/today", get(workouts::today))
        .route("/api/workouts/stats", get(workouts::stats))
        .route("/api/workouts/history", get(workouts::history))
        .route(
            "/api/workouts",
            get(workouts::list_workouts).post(workouts::create_workout),
        )
        .route(
            "/api/workouts/:id",
            get(workouts::get_workout)
                .patch(workouts::update_workout)
                .delete(workouts::delete_workout),
        )
        .route("/api/workouts/:id/start", post(workouts::start_workout))
        .route("/api/workouts/:id/complete", post(workouts::complete_workout));

    let ai_routes = Router::new()
        .route("/api/ai/requests", get(ai_content::list_requests))
        .route("/api/ai/requests/:id", get(ai_content::get_request))
        .route(
            "/api/ai/requests/:id/feedback",
            post(ai_content::submit_feedback),
        )
        .route("/api/ai/generate/workout", post(ai_content::generate_workout))
        .route(
            "/api/ai/generate/nutrition",
            post(ai_content::generate_nutrition),
        )
        .route("/api/ai/analyze/health", post(ai_content::analyze_health))
        .route("/api/ai/nutrition", get(nutrition::list_plans))
        .route(
            "/api/ai/nutrition/:id",
            get(nutrition::get_plan)
                .patch(nutrition::update_plan)
                .delete(nutrition::delete_plan),
        )
        .route("/api/ai/insights", get(insights::list_insights))
        .route(
            "/api/ai/insights/:id",
            get(insights::get_insight).patch(insights::update_insight),
        )
        .route("/api/ai/usage-stats", get(usage::usage_stats))
        .route("/api/ai/usage-stats/daily", get(usage::daily_usage));

    let protected_routes = Router::new()
        .merge(user_routes)
        .merge(workout_routes)
        .merge(ai_routes)
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness))
        .route("/metrics", get(health::metrics))
        .route("/api", get(health::api_root))
        .merge(SwaggerUi::new("/docs").url("/.well-known/openapi.json", ApiDoc::openapi()))
        .merge(login_route)
        .merge(register_route)
        .merge(protected_routes)
        .with_state(state.clone())
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(cors_layer(&state.config.allowed_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                None
            }
        }))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
