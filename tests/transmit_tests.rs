//! Pipeline behavior that can be verified without a reachable MH or firmador.
//!
//! Run with: `cargo test --features transmit --test transmit_tests`

#![cfg(feature = "transmit")]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::time::Duration;

use rust_decimal_macros::dec;
use svfe::core::*;
use svfe::dte::{Clock, CodeGenerator, Emission, EmissionDateTime, PointOfSale};
use svfe::mh::outcome::{
    self, AuthorityOutcome, MSG_SIGNATURE_MISSING, MSG_SIGNING_FAILED, MSG_TIMEOUT,
    OBS_NO_SERVER_RESPONSE, OBS_SIGNER_UNREACHABLE, OBS_TIMEOUT,
};
use svfe::mh::{Dispatcher, TimeoutPolicy};

struct FixedGenerator(&'static str);

impl CodeGenerator for FixedGenerator {
    fn generate(&self) -> String {
        self.0.to_string()
    }
}

struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> EmissionDateTime {
        EmissionDateTime {
            fec_emi: "2025-03-01".into(),
            hor_emi: "14:30:00".into(),
        }
    }
}

const CODE: &str = "b51337e6-aaaa-bbbb-cccc-1234567890ab";
const CODE_UPPER: &str = "B51337E6-AAAA-BBBB-CCCC-1234567890AB";

fn transmitter() -> Transmitter {
    Transmitter {
        nit: "06140101231035".into(),
        nrc: "1234567".into(),
        nombre: "COMERCIAL EJEMPLO S.A. DE C.V.".into(),
        nombre_comercial: "COMERCIAL EJEMPLO".into(),
        cod_actividad: "47510".into(),
        desc_actividad: "Venta al por menor".into(),
        direccion: Address {
            departamento: "06".into(),
            municipio: "14".into(),
            complemento: "Col. Escalon, San Salvador".into(),
        },
        telefono: "22501234".into(),
        correo: "facturas@ejemplo.sv".into(),
        clave_privada: "clave-privada".into(),
        clave_api: "clave-api".into(),
    }
}

fn point_of_sale() -> PointOfSale {
    PointOfSale {
        cod_estable: "0001".into(),
        cod_punto_venta: "0002".into(),
        cod_estable_mh: "N/A".into(),
        cod_punto_venta_mh: "N/A".into(),
        tipo_establecimiento: "01".into(),
    }
}

fn consumer() -> Customer {
    Customer {
        nombre: "JUAN PEREZ".into(),
        nombre_comercial: "N/A".into(),
        nrc: "0".into(),
        nit: "".into(),
        tipo_documento: "13".into(),
        num_documento: "045678901".into(),
        cod_actividad: "0".into(),
        desc_actividad: "N/A".into(),
        telefono: "".into(),
        correo: "juan@correo.sv".into(),
        direccion: Address {
            departamento: "06".into(),
            municipio: "14".into(),
            complemento: "San Salvador".into(),
        },
    }
}

fn cart_item() -> CartItem {
    CartItem {
        product_name: "Producto".into(),
        product_code: "P-001".into(),
        tipo_item: 1,
        uni_medida: 59,
        quantity: dec!(2),
        price: dec!(10.00),
        base_price: dec!(10.00),
        discount_amount: dec!(0),
        discount_percentage: dec!(0),
        non_subject_total: dec!(0),
        exempt_total: dec!(0),
        taxed_total: dec!(20.00),
        non_taxed: dec!(0),
    }
}

// Nothing listens on port 9 of localhost; connections fail immediately.
const DEAD_FIRMADOR: &str = "http://127.0.0.1:9/firmardocumento/";

fn dispatcher() -> Dispatcher {
    dispatcher_at(DEAD_FIRMADOR.to_string())
}

fn dispatcher_at(firmador_url: String) -> Dispatcher {
    Dispatcher::new(firmador_url, "auth-token")
        .unwrap()
        .with_collaborators(Box::new(FixedGenerator(CODE)), Box::new(FixedClock))
}

fn emission<'a>(transmitter: &'a Transmitter, pos: &'a PointOfSale) -> Emission<'a> {
    Emission {
        transmitter,
        point_of_sale: pos,
        correlative: 1,
        ambiente: Ambiente::Test,
        condicion_operacion: 1,
        pagos: vec![],
    }
}

fn request_complete(data: &[u8]) -> bool {
    let text = String::from_utf8_lossy(data);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let body_len = text[..header_end]
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())?
        })
        .unwrap_or(0);
    data.len() >= header_end + 4 + body_len
}

/// Loopback server that answers its first connection with the given JSON
/// body and then goes away.
fn one_shot_firmador(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut data = Vec::new();
            let mut buf = [0u8; 4096];
            while !request_complete(&data) {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => data.extend_from_slice(&buf[..n]),
                }
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{addr}/firmardocumento/")
}

#[tokio::test]
async fn unreachable_firmador_degrades_to_a_complete_rejection() {
    let t = transmitter();
    let pos = point_of_sale();
    let emission = Emission {
        transmitter: &t,
        point_of_sale: &pos,
        correlative: 1,
        ambiente: Ambiente::Test,
        condicion_operacion: 1,
        pagos: vec![],
    };

    let dispatch = dispatcher()
        .emit_factura(&emission, &consumer(), &[cart_item()], dec!(0))
        .await
        .unwrap();

    assert!(dispatch.firmado.is_none());
    let r = &dispatch.respuesta;
    assert_eq!(r.version, 0);
    assert_eq!(r.estado, ESTADO_RECHAZADO);
    assert_eq!(r.codigo_generacion, CODE_UPPER);
    assert_eq!(r.sello_recibido, None);
    assert_eq!(r.descripcion_msg, MSG_SIGNING_FAILED);
    assert_eq!(r.observaciones, vec![OBS_SIGNER_UNREACHABLE.to_string()]);
    assert_eq!(r.ambiente, "00");
    assert_eq!(r.fh_procesamiento, "2025-03-01 14:30:00");
}

#[tokio::test]
async fn signing_response_without_a_body_stops_before_transmission() {
    let t = transmitter();
    let pos = point_of_sale();
    // The service answers but carries no signed payload; the pipeline must
    // stop there instead of transmitting nothing to the authority.
    let url = one_shot_firmador(r#"{"status":"ERROR"}"#);

    let dispatch = dispatcher_at(url)
        .emit_factura(&emission(&t, &pos), &consumer(), &[cart_item()], dec!(0))
        .await
        .unwrap();

    assert!(dispatch.firmado.is_none());
    let r = &dispatch.respuesta;
    assert_eq!(r.version, 0);
    assert_eq!(r.estado, ESTADO_RECHAZADO);
    assert_eq!(r.sello_recibido, None);
    assert_eq!(r.descripcion_msg, MSG_SIGNATURE_MISSING);
    assert_eq!(r.observaciones, vec![OBS_NO_SERVER_RESPONSE.to_string()]);
}

#[tokio::test]
async fn unresponsive_firmador_hits_the_stage_deadline() {
    let t = transmitter();
    let pos = point_of_sale();
    // Accepted connections are held open without ever answering, so only the
    // stage deadline can end the wait.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/firmardocumento/", listener.local_addr().unwrap());

    let dispatch = dispatcher_at(url)
        .with_timeouts(TimeoutPolicy {
            sign: Duration::from_millis(50),
            transmit: Duration::from_secs(20),
        })
        .emit_factura(&emission(&t, &pos), &consumer(), &[cart_item()], dec!(0))
        .await
        .unwrap();

    assert!(dispatch.firmado.is_none());
    let r = &dispatch.respuesta;
    assert_eq!(r.version, 0);
    assert_eq!(r.estado, ESTADO_RECHAZADO);
    assert_eq!(r.sello_recibido, None);
    assert_eq!(r.descripcion_msg, MSG_TIMEOUT);
    assert_eq!(r.observaciones, vec![OBS_TIMEOUT.to_string()]);
    drop(listener);
}

#[tokio::test]
async fn invalid_input_fails_before_any_network_stage() {
    let t = transmitter();
    let pos = point_of_sale();
    let emission = Emission {
        transmitter: &t,
        point_of_sale: &pos,
        correlative: 1,
        ambiente: Ambiente::Test,
        condicion_operacion: 1,
        pagos: vec![],
    };

    // Empty cart: assembly refuses, so no substitute response is produced.
    let result = dispatcher()
        .emit_factura(&emission, &consumer(), &[], dec!(0))
        .await;
    assert!(matches!(result, Err(DteError::Validation(_))));
}

#[test]
fn substitute_diagnostics_cover_every_terminal_path() {
    let cases = [
        (MSG_TIMEOUT, OBS_TIMEOUT),
        (outcome::MSG_SIGNATURE_MISSING, outcome::OBS_NO_SERVER_RESPONSE),
        (MSG_SIGNING_FAILED, OBS_SIGNER_UNREACHABLE),
        (outcome::MSG_SEND_FAILED, outcome::OBS_NO_SERVER_RESPONSE),
        (outcome::MSG_MH_UNRESPONSIVE, outcome::OBS_NO_MH_RESPONSE),
    ];
    for (descripcion, observacion) in cases {
        let r = outcome::substitute(
            "00",
            CODE_UPPER,
            "2025-03-01 14:30:00".into(),
            descripcion,
            observacion,
        );
        assert_eq!(r.estado, ESTADO_RECHAZADO);
        assert_eq!(r.version, 0);
        assert_eq!(r.sello_recibido, None);
        assert_eq!(r.descripcion_msg, descripcion);
        assert_eq!(r.observaciones, vec![observacion.to_string()]);
    }
}

#[test]
fn classification_is_decided_once_from_the_estado_string() {
    let mut respuesta = RespuestaMh {
        version: 2,
        ambiente: "00".into(),
        version_app: 2,
        estado: ESTADO_PROCESADO.into(),
        codigo_generacion: CODE_UPPER.into(),
        sello_recibido: Some("2025SELLO".into()),
        fh_procesamiento: "2025-03-01 14:30:00".into(),
        clasifica_msg: None,
        codigo_msg: "001".into(),
        descripcion_msg: "RECIBIDO".into(),
        observaciones: vec![],
    };
    assert!(matches!(
        svfe::mh::classify(respuesta.clone()),
        AuthorityOutcome::Processed(_)
    ));
    respuesta.estado = "EN_PROCESO".into();
    assert!(matches!(
        svfe::mh::classify(respuesta),
        AuthorityOutcome::UnrecognizedStatus(_)
    ));
}

#[test]
fn timeout_policy_is_twenty_seconds_per_stage() {
    let policy = TimeoutPolicy::default();
    assert_eq!(policy.sign.as_secs(), 20);
    assert_eq!(policy.transmit.as_secs(), 20);
}

#[tokio::test]
async fn authority_response_parses_from_the_wire_shape() {
    let body = r#"{
        "version": 2,
        "ambiente": "00",
        "versionApp": 2,
        "estado": "PROCESADO",
        "codigoGeneracion": "B51337E6-AAAA-BBBB-CCCC-1234567890AB",
        "selloRecibido": "2025AAABBB",
        "fhProcesamiento": "01/03/2025 14:30:05",
        "clasificaMsg": "01",
        "codigoMsg": "001",
        "descripcionMsg": "RECIBIDO",
        "observaciones": []
    }"#;
    let respuesta: RespuestaMh = serde_json::from_str(body).unwrap();
    assert_eq!(respuesta.estado, "PROCESADO");
    assert_eq!(respuesta.sello_recibido.as_deref(), Some("2025AAABBB"));

    // Partial rejection bodies still parse; absent fields take defaults.
    let partial: RespuestaMh =
        serde_json::from_str(r#"{"estado":"RECHAZADO","descripcionMsg":"NIT INVALIDO"}"#).unwrap();
    assert_eq!(partial.estado, "RECHAZADO");
    assert_eq!(partial.version, 0);
    assert_eq!(partial.sello_recibido, None);
}
