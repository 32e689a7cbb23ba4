use std::io::Write;

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures::{StreamExt, TryStreamExt};
use log::error;
use serde_json::json;

use crate::disease::DiseaseRegistry;
use crate::error::ApiError;
use crate::inference::model::{argmax, PlantModel};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(root)))
        .service(web::resource("/predict/").route(web::post().to(predict)));
}

async fn root() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "API de Detecção de doenças de Plantas!" }))
}

fn ensure_image_content_type(content_type: Option<&mime::Mime>) -> Result<(), ApiError> {
    match content_type {
        Some(mime) if mime.type_() == mime::IMAGE => Ok(()),
        _ => Err(ApiError::NotAnImage),
    }
}

async fn predict(
    model: web::Data<PlantModel>,
    registry: web::Data<DiseaseRegistry>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let mut image_data = Vec::new();

    while let Ok(Some(mut field)) = payload.try_next().await {
        ensure_image_content_type(field.content_type())?;
        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| ApiError::Processing(e.to_string()))?;
            image_data
                .write_all(&data)
                .map_err(|e| ApiError::Processing(e.to_string()))?;
        }
    }

    if image_data.is_empty() {
        return Err(ApiError::MissingFile);
    }

    let model = model.get_ref().clone();
    let scores = web::block(move || model.infer(&image_data))
        .await
        .map_err(|e| ApiError::Processing(e.to_string()))?
        .map_err(|e| {
            error!("Model inference error: {e}");
            ApiError::Processing(e.to_string())
        })?;

    let class_index = argmax(&scores).ok_or_else(|| {
        error!("Model returned no scores");
        ApiError::Processing("saída do modelo vazia".to_string())
    })?;

    let label = registry.label_at(class_index).ok_or_else(|| {
        error!(
            "Predicted class index {} outside label list of {} entries",
            class_index,
            registry.len()
        );
        ApiError::Processing(format!("índice de classe {class_index} fora do intervalo"))
    })?;

    Ok(HttpResponse::Ok().json(registry.lookup(label)))
}
