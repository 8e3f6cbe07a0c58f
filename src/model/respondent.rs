use std::fmt::{Display, Formatter};

use data_encoding::HEXLOWER;
use log::debug;
use rocket::{
    http::{Cookie, SameSite},
    request::{FromRequest, Outcome},
    Request,
};

pub const RESPONDENT_COOKIE: &str = "respondent";

/// Random bytes in a freshly minted respondent key.
const KEY_BYTES: usize = 16;

/// The anonymous person making a request, identified by a private cookie.
///
/// A key is minted and set on the response the first time a browser is seen,
/// so every request has a respondent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Respondent(String);

impl Respondent {
    /// A new random respondent.
    pub fn generate() -> Self {
        let bytes: [u8; KEY_BYTES] = rand::random();
        Self(HEXLOWER.encode(&bytes))
    }

    pub fn key(&self) -> &str {
        &self.0
    }

    fn into_cookie(self) -> Cookie<'static> {
        Cookie::build(RESPONDENT_COOKIE, self.0)
            .http_only(true)
            .same_site(SameSite::Lax)
            .permanent()
            .finish()
    }
}

impl Display for Respondent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Respondent {
    type Error = ();

    /// Read the respondent from the cookie, minting one if there is none.
    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        // Cached so that several guards in one request agree.
        let respondent = req.local_cache(|| {
            let cookies = req.cookies();
            match cookies.get_private(RESPONDENT_COOKIE) {
                Some(cookie) if !cookie.value().is_empty() => {
                    Respondent(cookie.value().to_string())
                }
                _ => {
                    let respondent = Respondent::generate();
                    debug!("New respondent {respondent}");
                    cookies.add_private(respondent.clone().into_cookie());
                    respondent
                }
            }
        });
        Outcome::Success(respondent.clone())
    }
}
