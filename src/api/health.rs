//! 健康检查服务
//!
//! 基础设施端点，直接查存储不经过业务层。只统计行数，
//! 不加载全表。

use std::time::{Duration, Instant};

use actix_web::{HttpResponse, Responder, web};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde_json::json;
use tracing::{error, trace};

use migration::entities::banner_link_media;

pub struct HealthService;

impl HealthService {
    pub async fn health_check(db: web::Data<DatabaseConnection>) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let count_check = tokio::time::timeout(
            Duration::from_secs(5),
            banner_link_media::Entity::find().count(db.get_ref()),
        )
        .await;

        let (status, links_count, storage_error) = match count_check {
            Ok(Ok(count)) => {
                trace!("Storage health check passed, {} banner links found", count);
                ("healthy", Some(count), None)
            }
            Ok(Err(e)) => {
                error!("Storage health check failed: {}", e);
                ("unhealthy", None, Some(format!("database error: {}", e)))
            }
            Err(_) => {
                error!("Storage health check timeout");
                ("unhealthy", None, Some("timeout".to_string()))
            }
        };

        let body = json!({
            "status": status,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "checks": {
                "storage": {
                    "status": status,
                    "banner_links_count": links_count,
                    "error": storage_error,
                }
            },
            "response_time_ms": start_time.elapsed().as_millis() as u32,
        });

        if status == "healthy" {
            HttpResponse::Ok().json(body)
        } else {
            HttpResponse::ServiceUnavailable().json(body)
        }
    }

    /// 存活探针，不查数据库
    pub async fn liveness_check() -> impl Responder {
        HttpResponse::Ok().json(json!({
            "status": "alive",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }))
    }
}
