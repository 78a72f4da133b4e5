use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use futures_util::TryStreamExt;

use crate::api::{error, success};
use crate::middlewares::get_claims;
use crate::modules::file::model::{IngestItem, ListFilesQuery};
use crate::modules::file::schema::{FileEntity, FileUploadResponse, ShareResponse};
use crate::modules::file::service::FileService;
use crate::utils::ValidatedQuery;

/// Accepts one or more multipart file parts and ingests them concurrently.
#[post("/upload")]
pub async fn upload_files(
    mut payload: Multipart,
    req: HttpRequest,
    file_service: web::Data<FileService>,
) -> Result<success::Success<Vec<FileUploadResponse>>, error::Error> {
    let owner_id = get_claims(&req)?.sub;

    let mut items = Vec::new();
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|_| error::Error::bad_request("Malformed multipart payload"))?
    {
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(|name| name.to_string());
        // parts without a filename are not file uploads
        let Some(filename) = filename else { continue };

        let content_type = field.content_type().map(|m| m.to_string()).unwrap_or_else(|| {
            mime_guess::from_path(&filename).first_or_octet_stream().to_string()
        });

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(|_| error::Error::InternalServer)? {
            bytes.extend_from_slice(&chunk);
        }

        items.push(IngestItem { original_name: filename, content_type, bytes });
    }

    if items.is_empty() {
        return Err(error::Error::bad_request("No file found in request"));
    }

    let records = file_service.ingest_many(owner_id, items).await?;
    let responses = records
        .into_iter()
        .map(|entity| FileUploadResponse {
            url: file_service.public_url(entity.id),
            id: entity.id,
            filename: entity.original_name,
            size: entity.size_bytes,
        })
        .collect();

    Ok(success::Success::created(Some(responses)).message("Files uploaded successfully"))
}

#[get("/files")]
pub async fn list_files(
    req: HttpRequest,
    query: ValidatedQuery<ListFilesQuery>,
    file_service: web::Data<FileService>,
) -> Result<success::Success<Vec<FileEntity>>, error::Error> {
    let owner_id = get_claims(&req)?.sub;

    let files = match query.0.search {
        Some(ref needle) if !needle.is_empty() => file_service.search(owner_id, needle).await?,
        _ => file_service.list_by_owner(owner_id).await?,
    };

    Ok(success::Success::ok(Some(files)))
}

/// Serves the stored bytes with the advisory content type.
#[get("/files/{file_id}")]
pub async fn get_file(
    req: HttpRequest,
    file_id: web::Path<i64>,
    file_service: web::Data<FileService>,
) -> Result<HttpResponse, error::Error> {
    let requester_id = get_claims(&req)?.sub;

    let file = file_service.read(file_id.into_inner(), requester_id).await?;
    let bytes = file_service.read_contents(&file).await?;

    Ok(HttpResponse::Ok().content_type(file.content_type).body(bytes))
}

#[get("/share/{file_id}")]
pub async fn share_file(
    req: HttpRequest,
    file_id: web::Path<i64>,
    file_service: web::Data<FileService>,
) -> Result<success::Success<ShareResponse>, error::Error> {
    let requester_id = get_claims(&req)?.sub;

    let url = file_service.set_public(file_id.into_inner(), requester_id).await?;
    Ok(success::Success::ok(Some(ShareResponse { url })))
}

#[delete("/files/{file_id}")]
pub async fn delete_file(
    req: HttpRequest,
    file_id: web::Path<i64>,
    file_service: web::Data<FileService>,
) -> Result<success::Success<()>, error::Error> {
    let requester_id = get_claims(&req)?.sub;

    file_service.delete(file_id.into_inner(), requester_id).await?;
    Ok(success::Success::ok(None).message("File deleted successfully"))
}
