use crate::models::*;
use crate::services::{AppWheelService, WheelAdminService};
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

/// 从请求扩展中获取用户ID（中间件在校验后注入）
pub(crate) fn get_user_id_from_request(req: &HttpRequest) -> Option<i64> {
    req.extensions().get::<i64>().copied()
}

#[utoipa::path(
    get,
    path = "/wheels",
    tag = "wheel",
    responses(
        (status = 200, description = "获取上架转盘列表成功", body = [WheelResponse])
    )
)]
/// 获取全部上架转盘（含奖品配置, 公开接口）
pub async fn list_wheels(admin: web::Data<WheelAdminService>) -> Result<HttpResponse> {
    match admin.list_active().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/wheels/{wheel_id}",
    tag = "wheel",
    params(
        ("wheel_id" = i64, Path, description = "转盘ID")
    ),
    responses(
        (status = 200, description = "获取转盘详情成功", body = WheelResponse),
        (status = 404, description = "转盘不存在或已下架")
    )
)]
/// 获取单个上架转盘详情（下架转盘视同不存在）
pub async fn get_wheel(
    admin: web::Data<WheelAdminService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match admin.get_active(path.into_inner()).await {
        Ok(wheel) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": wheel }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/wheels/{wheel_id}/spin",
    tag = "wheel",
    params(
        ("wheel_id" = i64, Path, description = "转盘ID")
    ),
    request_body = SpinRequest,
    security(
        ("gateway_identity" = [])
    ),
    responses(
        (status = 200, description = "抽奖成功", body = SpinResponse),
        (status = 400, description = "余额不足或其它业务错误"),
        (status = 401, description = "未授权"),
        (status = 404, description = "转盘不存在或已下架"),
        (status = 429, description = "达到每日上限或冷却中")
    )
)]
/// 进行一次抽奖:
/// 1. 检查每日上限与冷却
/// 2. 按支付方式扣费
/// 3. 按概率分桶选择奖品
/// 4. 货币奖品入账, 实物奖品触发履约, 生成抽奖记录
pub async fn spin(
    service: web::Data<AppWheelService>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<SpinRequest>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    let wheel_id = path.into_inner();
    match service.spin(user_id, wheel_id, body.payment_method).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/wheels/{wheel_id}/records",
    tag = "wheel",
    params(
        ("wheel_id" = i64, Path, description = "转盘ID"),
        ("page" = Option<u32>, Query, description = "页码 (默认1)"),
        ("per_page" = Option<u32>, Query, description = "每页数量 (默认20)")
    ),
    security(
        ("gateway_identity" = [])
    ),
    responses(
        (status = 200, description = "获取抽奖记录成功", body = SpinRecordPageResponse),
        (status = 401, description = "未授权")
    )
)]
/// 分页获取当前用户在该转盘的抽奖记录（倒序）
pub async fn get_records(
    service: web::Data<AppWheelService>,
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<SpinRecordQuery>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);
    let wheel_id = path.into_inner();
    match service.list_records(user_id, wheel_id, &query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": page }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn wheel_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/wheels")
            .route("", web::get().to(list_wheels))
            .route("/{wheel_id}", web::get().to(get_wheel))
            .route("/{wheel_id}/spin", web::post().to(spin))
            .route("/{wheel_id}/records", web::get().to(get_records)),
    );
}
