use crate::models::BalanceResponse;
use crate::services::PgSpendLedger;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use super::wheel::get_user_id_from_request;

#[utoipa::path(
    get,
    path = "/balance",
    tag = "balance",
    security(
        ("gateway_identity" = [])
    ),
    responses(
        (status = 200, description = "获取余额成功", body = BalanceResponse),
        (status = 401, description = "未授权")
    )
)]
/// 获取当前用户余额（首次访问自动初始化为全 0）
pub async fn get_balance(
    ledger: web::Data<PgSpendLedger>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    match ledger.snapshot(user_id).await {
        Ok(balance) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": balance }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn balance_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/balance", web::get().to(get_balance));
}
