use crate::modules::file::handle::*;
use actix_web::web::ServiceConfig;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(upload_files)
        .service(list_files)
        .service(get_file)
        .service(share_file)
        .service(delete_file);
}
