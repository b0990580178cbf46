use crate::models::*;
use crate::services::{PgSpendLedger, SpendLedger, WheelAdminService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/admin/wheels",
    tag = "admin",
    security(
        ("gateway_identity" = [])
    ),
    responses(
        (status = 200, description = "获取全部转盘成功", body = [WheelResponse]),
        (status = 401, description = "未授权")
    )
)]
/// 获取全部转盘, 含已下架（管理端）
pub async fn list_all_wheels(admin: web::Data<WheelAdminService>) -> Result<HttpResponse> {
    match admin.list_all().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/wheels",
    tag = "admin",
    request_body = CreateWheelRequest,
    security(
        ("gateway_identity" = [])
    ),
    responses(
        (status = 200, description = "创建转盘成功", body = WheelResponse),
        (status = 400, description = "配置校验失败"),
        (status = 401, description = "未授权")
    )
)]
/// 创建转盘（启用奖品概率之和必须为 100）
pub async fn create_wheel(
    admin: web::Data<WheelAdminService>,
    body: web::Json<CreateWheelRequest>,
) -> Result<HttpResponse> {
    match admin.create_wheel(body.into_inner()).await {
        Ok(wheel) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": wheel }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/wheels/{wheel_id}",
    tag = "admin",
    params(
        ("wheel_id" = i64, Path, description = "转盘ID")
    ),
    request_body = UpdateWheelRequest,
    security(
        ("gateway_identity" = [])
    ),
    responses(
        (status = 200, description = "更新转盘成功", body = WheelResponse),
        (status = 400, description = "配置校验失败"),
        (status = 401, description = "未授权"),
        (status = 404, description = "转盘不存在")
    )
)]
/// 更新转盘（prizes 提供时整组替换）
pub async fn update_wheel(
    admin: web::Data<WheelAdminService>,
    path: web::Path<i64>,
    body: web::Json<UpdateWheelRequest>,
) -> Result<HttpResponse> {
    match admin.update_wheel(path.into_inner(), body.into_inner()).await {
        Ok(wheel) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": wheel }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/balances/{user_id}/credit",
    tag = "admin",
    params(
        ("user_id" = i64, Path, description = "用户ID")
    ),
    request_body = AdjustBalanceRequest,
    security(
        ("gateway_identity" = [])
    ),
    responses(
        (status = 200, description = "入账成功"),
        (status = 400, description = "金额非法"),
        (status = 401, description = "未授权")
    )
)]
/// 管理端手工入账（充值 / 补偿; 金额必须非负）
pub async fn credit_balance(
    ledger: web::Data<PgSpendLedger>,
    path: web::Path<i64>,
    body: web::Json<AdjustBalanceRequest>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    let req = body.into_inner();
    match ledger.credit(user_id, req.currency, req.amount).await {
        Ok(balance_after) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "currency": req.currency,
                "balance_after": balance_after,
            }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/wheels", web::get().to(list_all_wheels))
            .route("/wheels", web::post().to(create_wheel))
            .route("/wheels/{wheel_id}", web::put().to(update_wheel))
            .route("/balances/{user_id}/credit", web::post().to(credit_balance)),
    );
}
