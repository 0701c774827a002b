use bytes::{Buf, BytesMut};
use http::StatusCode;
use micro_fields::auth::AuthList;
use micro_fields::codec::{HeadEncoder, MessageHead};
use micro_fields::fields::Fields;
use micro_fields::protocol::{Field, FieldError, Http, SipUdp};
use tokio_util::codec::Encoder;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let sip = match sip_invite() {
        Ok(fields) => fields,
        Err(e) => {
            warn!(cause = %e, "build sip request error");
            return;
        }
    };
    let mut view = match sip.request_view(20) {
        Ok(view) => view,
        Err(e) => {
            warn!(cause = %e, "serialize sip request error");
            return;
        }
    };
    info!(bytes = view.remaining(), fragments = view.fragments().count(), "sip request head");
    let head = view.copy_to_bytes(view.remaining());
    print!("{}", String::from_utf8_lossy(&head));

    let http = match http_unauthorized() {
        Ok(fields) => fields,
        Err(e) => {
            warn!(cause = %e, "build http response error");
            return;
        }
    };
    let mut dst = BytesMut::new();
    if let Err(e) = HeadEncoder::<Http>::new().encode((&http, MessageHead::Response { version: 11, status: StatusCode::UNAUTHORIZED }), &mut dst) {
        warn!(cause = %e, "encode http response error");
        return;
    }
    print!("{}", String::from_utf8_lossy(&dst));

    for challenge in AuthList::new(http.get(Field::WwwAuthenticate)) {
        info!(scheme = challenge.scheme(), token68 = challenge.token68(), "challenge");
        for param in challenge.params() {
            info!(name = param.name(), value = param.value(), "auth-param");
        }
    }

    if let Err(e) = HeadEncoder::<Http>::new().encode((&http, MessageHead::Response { version: 20, status: StatusCode::UNAUTHORIZED }), &mut dst) {
        info!(cause = %e, "invalid version rejected");
    }
}

fn sip_invite() -> Result<Fields<SipUdp>, FieldError> {
    let mut fields = Fields::<SipUdp>::with_capacity(8);
    fields.set_method("INVITE");
    fields.set_target("sip:bob@biloxi.example.com");
    fields.insert(Field::Via, "SIP/2.0/UDP pc33.atlanta.example.com;branch=z9hG4bK776asdhds")?;
    fields.insert(Field::To, "Bob <sip:bob@biloxi.example.com>")?;
    fields.insert(Field::From, "Alice <sip:alice@atlanta.example.com>;tag=1928301774")?;
    fields.insert(Field::CallId, "a84b4c76e66710@pc33.atlanta.example.com")?;
    fields.insert(Field::Cseq, "314159 INVITE")?;
    fields.insert("Max-Forwards", "70")?;
    fields.prepare_payload(20, Some(0))?;
    Ok(fields)
}

fn http_unauthorized() -> Result<Fields<Http>, FieldError> {
    let mut fields = Fields::<Http>::new();
    fields.insert(Field::Server, "micro-fields")?;
    fields.insert(Field::WwwAuthenticate, r#"Newauth realm="apps", type=1, title="Login to \"apps\"", Basic realm="simple""#)?;
    fields.set_keep_alive(11, false)?;
    fields.prepare_payload(11, None)?;
    Ok(fields)
}
