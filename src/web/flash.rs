use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlashKind {
    Success,
    Error,
}

/// A one-shot message carried across a redirect in a cookie, read and
/// cleared by the next page render.
#[derive(Debug, Clone)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

pub fn set(jar: CookieJar, kind: FlashKind, message: &str) -> CookieJar {
    let kind = match kind {
        FlashKind::Success => "success",
        FlashKind::Error => "error",
    };
    let value = format!("{kind}:{}", urlencoding::encode(message));
    let cookie = Cookie::build((FLASH_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

pub fn take(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let flash = jar.get(FLASH_COOKIE).and_then(|cookie| parse(cookie.value()));
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/").build());
    (jar, flash)
}

fn parse(value: &str) -> Option<Flash> {
    let (kind, encoded) = value.split_once(':')?;
    let kind = match kind {
        "success" => FlashKind::Success,
        "error" => FlashKind::Error,
        _ => return None,
    };
    let message = urlencoding::decode(encoded).ok()?.into_owned();
    Some(Flash { kind, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survives_a_set_take_round_trip() {
        let jar = set(CookieJar::new(), FlashKind::Success, "Pet added.");
        let (_, flash) = take(jar);
        let flash = flash.unwrap();
        assert_eq!(flash.kind, FlashKind::Success);
        assert_eq!(flash.message, "Pet added.");
    }

    #[test]
    fn take_clears_the_cookie() {
        let jar = set(CookieJar::new(), FlashKind::Error, "nope");
        let (jar, _) = take(jar);
        let (_, flash) = take(jar);
        assert!(flash.is_none());
    }

    #[test]
    fn garbage_cookie_values_are_ignored() {
        assert!(parse("not-a-flash").is_none());
        assert!(parse("warning:hm").is_none());
    }
}
