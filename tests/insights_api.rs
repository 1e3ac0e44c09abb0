//! End-to-end tests: SQLite store, engine and router wired as the server does.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use moodmeal::api::{build_router, AppState, USER_ID_HEADER};
use moodmeal::config::ApiConfig;
use moodmeal::insights::{FixedClock, InsightsConfig, InsightsEngine};
use moodmeal::store::{MealCsvImporter, MoodObservation, NewMeal, SqliteStore, SwapRecord, UserId};
use moodmeal::swaps::SwapHistoryService;
use std::sync::Arc;
use tower::util::ServiceExt;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 18, 0, 0).unwrap()
}

async fn seeded_store(dir: &tempfile::TempDir) -> Arc<SqliteStore> {
    let store = Arc::new(SqliteStore::open(dir.path().join("moodmeal.db")).unwrap());
    let user = UserId(1);

    let meals = [
        ("Breakfast", "oats, blueberries, yogurt", 3, 2, 4),
        ("Lunch", "salad, salmon", 2, 3, 4),
        ("Dinner", "salmon, rice, broccoli", 1, 3, 5),
        ("Snack", "chips", 1, 4, 2),
        ("Breakfast", "Oats, banana", 0, 2, 3),
    ];
    for (meal_type, foods, days_ago, pre, post) in meals {
        store
            .insert_meal(
                NewMeal::new(user, meal_type, foods, now() - Duration::days(days_ago))
                    .mood(MoodObservation::pre(pre).state("Tired"))
                    .mood(MoodObservation::post(post).state("Content")),
            )
            .await
            .unwrap();
    }

    store
        .insert_swap(SwapRecord {
            id: 0,
            user_id: user,
            original_item: "chocolate bar".to_string(),
            suggested_swap: "Dark chocolate square with almonds".to_string(),
            accepted: true,
            craving_type: "Sweet".to_string(),
            satisfaction_rating: Some(5),
            created_at: now() - Duration::days(2),
            completed_at: Some(now() - Duration::days(1)),
        })
        .await
        .unwrap();

    store
}

fn app(store: Arc<SqliteStore>) -> Router {
    let engine = Arc::new(InsightsEngine::new(
        store.clone(),
        Arc::new(FixedClock(now())),
        InsightsConfig::default(),
    ));
    let swaps = Arc::new(SwapHistoryService::new(store.clone()));
    build_router(AppState::new(engine, swaps, store, ApiConfig::default()))
}

async fn get(app: Router, uri: &str, user: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(USER_ID_HEADER, user)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_mood_calendar_over_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(seeded_store(&dir).await);

    let (status, body) = get(app, "/api/insights/mood-calendar", "1").await;
    assert_eq!(status, StatusCode::OK);

    let days = body["calendarData"].as_array().unwrap();
    let dates: Vec<&str> = days.iter().map(|d| d["date"].as_str().unwrap()).collect();
    assert_eq!(dates, vec!["2024-06-15", "2024-06-14", "2024-06-13", "2024-06-12"]);

    // 06-14 holds salmon/rice (3, 5) and chips (4, 2)
    assert_eq!(days[1]["avgMoodIntensity"], 3.5);
    assert_eq!(days[1]["avgMoodIntensityText"], "3.50");
    assert_eq!(days[1]["meals"].as_array().unwrap().len(), 2);
    assert_eq!(days[1]["meals"][0]["moods"][0]["moodState"], "Tired");
}

#[tokio::test]
async fn test_mood_calendar_date_filter() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(seeded_store(&dir).await);

    let (status, body) = get(
        app,
        "/api/insights/mood-calendar?startDate=2024-06-13&endDate=2024-06-14",
        "1",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // endDate is midnight, so only 06-13 falls inside
    let days = body["calendarData"].as_array().unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0]["date"], "2024-06-13");
}

#[tokio::test]
async fn test_patterns_over_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(seeded_store(&dir).await);

    let (status, body) = get(app, "/api/insights/patterns", "1").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["totalMealsLogged"], 5);
    let top = body["topMoodBoostingFoods"].as_array().unwrap();
    let foods: Vec<&str> = top.iter().map(|f| f["food"].as_str().unwrap()).collect();
    assert_eq!(foods, vec!["oats", "salmon"]);
    assert_eq!(top[0]["moodImprovement"], 2);

    assert_eq!(body["weeklyTrend"]["totalMeals"], 5);
    assert_eq!(body["weeklyTrend"]["avgMoodBefore"], 2.8);
    assert_eq!(body["weeklyTrend"]["avgMoodAfter"], 3.6);
    assert_eq!(body["weeklyTrend"]["moodImprovement"], 0.8);
}

#[tokio::test]
async fn test_achievements_over_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(seeded_store(&dir).await);

    let (status, body) = get(app, "/api/insights/achievements", "1").await;
    assert_eq!(status, StatusCode::OK);

    let achievements = &body["achievements"];
    assert_eq!(achievements["maxStreak"], 4);
    assert_eq!(achievements["balancedDayCount"], 2);
    assert_eq!(
        achievements["newFoodsTried"],
        serde_json::json!(["oats", "blueberries", "yogurt", "salad", "salmon", "rice", "broccoli", "chips", "banana"])
    );
}

#[tokio::test]
async fn test_other_user_sees_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&dir).await;

    let (status, body) = get(app(store.clone()), "/api/insights/achievements", "2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({"message": "No meals logged yet", "achievements": {}})
    );

    let (_, body) = get(app(store), "/api/insights/mood-calendar", "2").await;
    assert_eq!(body["calendarData"], serde_json::json!([]));
}

#[tokio::test]
async fn test_swap_history_over_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(seeded_store(&dir).await);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/insights/achievements")
                .header(USER_ID_HEADER, "1")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"satisfactionRating": 5}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["total"], 1);
    assert_eq!(body["swaps"][0]["originalItem"], "chocolate bar");
}

#[tokio::test]
async fn test_csv_seeded_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqliteStore::open(dir.path().join("seeded.db")).unwrap());

    let csv = "user_id,meal_type,foods,timestamp,pre_intensity,post_intensity,pre_mood,post_mood,notes\n\
               3,Lunch,\"rice, beans\",2024-06-14T12:00:00Z,2,4,Tired,Happy,\n\
               3,Dinner,rice,2024-06-15T12:00:00Z,3,5,,,\n";
    let result = MealCsvImporter::new().import_reader(csv.as_bytes());
    assert_eq!(result.rows_failed, 0);
    for meal in result.meals {
        store.insert_meal(meal).await.unwrap();
    }

    let (status, body) = get(app(store), "/api/insights/patterns", "3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["topMoodBoostingFoods"][0]["food"], "rice");
    assert_eq!(body["topMoodBoostingFoods"][0]["count"], 2);
}
