use quick_xml::events::Event;
use quick_xml::Reader;

/// SOAP fault from the Metadata API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SoapFault {
    pub fault_code: String,
    pub fault_string: String,
}

#[derive(Clone, Copy)]
enum FaultPart {
    Code,
    String,
}

/// Find a `Fault` element and read its `faultcode` / `faultstring`.
///
/// Elements are matched by local name, so any namespace prefix is accepted.
/// Returns `Ok(None)` for well-formed XML without a fault.
pub(crate) fn parse_soap_fault(xml: &str) -> Result<Option<SoapFault>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_fault = false;
    let mut seen_fault = false;
    let mut current: Option<FaultPart> = None;
    let mut fault_code: Option<String> = None;
    let mut fault_string: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"Fault" => {
                    in_fault = true;
                    seen_fault = true;
                }
                b"faultcode" if in_fault => current = Some(FaultPart::Code),
                b"faultstring" if in_fault => current = Some(FaultPart::String),
                _ => {}
            },
            Event::Text(text) => {
                if let Some(part) = current {
                    let value = text.unescape()?;
                    append(part, &value, &mut fault_code, &mut fault_string);
                }
            }
            Event::CData(cdata) => {
                if let Some(part) = current {
                    let value = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                    append(part, &value, &mut fault_code, &mut fault_string);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"Fault" => in_fault = false,
                b"faultcode" | b"faultstring" => current = None,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_fault {
        return Ok(None);
    }
    Ok(Some(SoapFault {
        fault_code: fault_code.unwrap_or_default(),
        fault_string: fault_string.unwrap_or_else(|| "Unknown error".to_string()),
    }))
}

fn append(part: FaultPart, value: &str, code: &mut Option<String>, string: &mut Option<String>) {
    let slot = match part {
        FaultPart::Code => code,
        FaultPart::String => string,
    };
    slot.get_or_insert_with(String::new).push_str(value);
}

/// Text of the first element with the given local name.
pub(crate) fn element_text(xml: &str, local_name: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut inside = false;
    let mut text = String::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if !inside && e.local_name().as_ref() == local_name.as_bytes() => {
                inside = true;
            }
            Ok(Event::Text(t)) if inside => text.push_str(&t.unescape().ok()?),
            Ok(Event::End(e)) if inside && e.local_name().as_ref() == local_name.as_bytes() => {
                return Some(text);
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}
