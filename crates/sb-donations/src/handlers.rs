use super::*;
use actix_multipart::Multipart;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::guard::GuardContext;
use actix_web::http::header;
use actix_web::web;
use futures::StreamExt;
use sb_auth::Auth;
use sb_core::ID;
use sb_core::Unique;
use time::OffsetDateTime;

/// Form field carrying the image in multipart uploads.
pub const FILE_FIELD: &str = "file";
/// Largest accepted image.
pub const MAX_IMAGE: usize = 10 * 1024 * 1024;

pub async fn create(
    auth: Auth,
    db: web::Data<dyn Donations>,
    req: web::Json<NewDonation>,
) -> Result<HttpResponse, DonationError> {
    req.validate()?;
    let donation = Donation::new(auth.user(), req.into_inner(), OffsetDateTime::now_utc());
    db.insert(&donation).await?;
    log::info!("member {} listed donation {}", auth.user(), donation.id());
    Ok(HttpResponse::Ok().json(donation))
}

pub async fn list(
    _: Auth,
    db: web::Data<dyn Donations>,
    page: web::Query<Page>,
) -> Result<HttpResponse, DonationError> {
    Ok(HttpResponse::Ok().json(db.list(&page).await?))
}

pub async fn mine(
    auth: Auth,
    db: web::Data<dyn Donations>,
    page: web::Query<Page>,
) -> Result<HttpResponse, DonationError> {
    Ok(HttpResponse::Ok().json(db.donated_by(auth.user(), &page).await?))
}

pub async fn claimed(
    auth: Auth,
    db: web::Data<dyn Donations>,
    page: web::Query<Page>,
) -> Result<HttpResponse, DonationError> {
    Ok(HttpResponse::Ok().json(db.claimed_by(auth.user(), &page).await?))
}

pub async fn read(
    _: Auth,
    db: web::Data<dyn Donations>,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, DonationError> {
    let donation = db
        .find(ID::from(path.into_inner()))
        .await?
        .ok_or(DonationError::NotFound)?;
    Ok(HttpResponse::Ok().json(donation))
}

pub async fn update(
    auth: Auth,
    db: web::Data<dyn Donations>,
    path: web::Path<uuid::Uuid>,
    req: web::Json<DonationPatch>,
) -> Result<HttpResponse, DonationError> {
    let donation = owned(&auth, db.get_ref(), ID::from(path.into_inner())).await?;
    req.validate()?;
    let read = donation.status;
    let donation = donation.patch(req.into_inner(), OffsetDateTime::now_utc());
    let updated = db
        .update(&donation, read)
        .await?
        .ok_or(DonationError::Conflict)?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete(
    auth: Auth,
    db: web::Data<dyn Donations>,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, DonationError> {
    let donation = owned(&auth, db.get_ref(), ID::from(path.into_inner())).await?;
    let deleted = db
        .delete(donation.id())
        .await?
        .ok_or(DonationError::NotFound)?;
    log::info!("member {} withdrew donation {}", auth.user(), deleted.id());
    Ok(HttpResponse::Ok().json(deleted))
}

pub async fn claim(
    auth: Auth,
    db: web::Data<dyn Donations>,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, DonationError> {
    let id = ID::from(path.into_inner());
    let donation = db.find(id).await?.ok_or(DonationError::NotFound)?;
    if donation.status != Status::Available {
        return Err(DonationError::Unavailable);
    }
    if donation.owned_by(auth.user()) {
        return Err(DonationError::OwnDonation);
    }
    let claimed = db
        .claim(id, auth.user(), OffsetDateTime::now_utc())
        .await?
        .ok_or(DonationError::Unavailable)?;
    log::info!("member {} claimed donation {}", auth.user(), id);
    Ok(HttpResponse::Ok().json(claimed))
}

/// Accepts a raw image body, checks its declared type against its
/// signature, and stores it under a fresh name.
pub async fn upload(
    _: Auth,
    store: web::Data<dyn ObjectStore>,
    query: web::Query<Upload>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, DonationError> {
    let image = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .and_then(Image::from_mime)
        .ok_or(DonationError::Invalid("invalid image type"))?;
    let uploaded = keep(store.get_ref(), image, query.filename.as_deref(), &body).await?;
    Ok(HttpResponse::Ok().json(uploaded))
}

/// Form variant of [`upload`]: the image travels in a `file` field of a
/// `multipart/form-data` body, with its own type and filename.
pub async fn upload_form(
    _: Auth,
    store: web::Data<dyn ObjectStore>,
    mut form: Multipart,
) -> Result<HttpResponse, DonationError> {
    while let Some(field) = form.next().await {
        let mut field = field.map_err(malformed)?;
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let image = field
            .content_type()
            .and_then(|mime| Image::from_mime(mime.essence_str()))
            .ok_or(DonationError::Invalid("invalid image type"))?;
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(String::from);
        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            bytes.extend_from_slice(&chunk.map_err(malformed)?);
            if bytes.len() > MAX_IMAGE {
                return Err(DonationError::Invalid("image too large"));
            }
        }
        let uploaded = keep(store.get_ref(), image, filename.as_deref(), &bytes).await?;
        return Ok(HttpResponse::Ok().json(uploaded));
    }
    Err(DonationError::Invalid("missing file field"))
}

/// Routes form uploads to [`upload_form`].
pub fn multipart(ctx: &GuardContext<'_>) -> bool {
    ctx.head()
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|h| h.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
}

fn malformed(e: actix_multipart::MultipartError) -> DonationError {
    log::debug!("rejected multipart body: {}", e);
    DonationError::Invalid("malformed multipart body")
}

async fn keep(
    store: &dyn ObjectStore,
    image: Image,
    filename: Option<&str>,
    bytes: &[u8],
) -> Result<Uploaded, DonationError> {
    if !image.sniff(bytes) {
        return Err(DonationError::Invalid("invalid image file"));
    }
    let filename = image.name(filename);
    store.ensure().await?;
    store.put(&filename, bytes, image.mime()).await?;
    Ok(Uploaded {
        url: format!("/minio/{}/{}", store.bucket(), filename),
        filename,
    })
}

/// Loads a listing the caller is allowed to modify.
async fn owned(auth: &Auth, db: &dyn Donations, id: ID<Donation>) -> Result<Donation, DonationError> {
    db.find(id)
        .await?
        .ok_or(DonationError::NotFound)
        .and_then(|donation| match donation.owned_by(auth.user()) {
            true => Ok(donation),
            false => Err(DonationError::Forbidden),
        })
}
