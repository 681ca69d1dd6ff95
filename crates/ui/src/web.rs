//! Browser-only plumbing: the file picker and the print frame.

use shelfmark_core::LoadTicket;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::app::{PendingLoad, PendingRead, PendingSlot, SPREADSHEET_EXTENSIONS};

const PRINT_FRAME_ID: &str = "shelfmark-print-frame";

fn document() -> Result<web_sys::Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn settle(slot: &PendingSlot, ctx: &egui::Context, read: PendingRead) {
    if let Ok(mut lock) = slot.lock() {
        *lock = Some(read);
    }
    ctx.request_repaint();
}

/// Show the browser's file picker. The chosen file is read asynchronously
/// into `slot`, tagged with `ticket`, and a repaint is requested. A dismissed
/// picker or a failed read settles the slot as abandoned.
pub(crate) fn pick_file(
    ticket: LoadTicket,
    slot: PendingSlot,
    ctx: egui::Context,
) -> Result<(), JsValue> {
    let input = document()?
        .create_element("input")?
        .dyn_into::<web_sys::HtmlInputElement>()
        .map_err(|_| JsValue::from_str("not an input element"))?;
    input.set_type("file");
    let accept: Vec<String> = SPREADSHEET_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect();
    input.set_accept(&accept.join(","));

    let (cancel_slot, cancel_ctx) = (slot.clone(), ctx.clone());
    let oncancel = Closure::<dyn FnMut()>::new(move || {
        log::debug!("file picker dismissed");
        settle(&cancel_slot, &cancel_ctx, PendingRead::Abandoned(ticket));
    });
    input.add_event_listener_with_callback("cancel", oncancel.as_ref().unchecked_ref())?;
    oncancel.forget();

    let picked = input.clone();
    let onchange = Closure::<dyn FnMut()>::new(move || {
        let Some(file) = picked.files().and_then(|list| list.get(0)) else {
            settle(&slot, &ctx, PendingRead::Abandoned(ticket));
            return;
        };
        let slot = slot.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let name = file.name();
            let read = match JsFuture::from(file.array_buffer()).await {
                Ok(buf) => {
                    let bytes = js_sys::Uint8Array::new(&buf).to_vec();
                    log::debug!("read {} bytes from {name}", bytes.len());
                    PendingRead::Loaded(PendingLoad {
                        ticket,
                        name,
                        bytes,
                    })
                }
                Err(e) => {
                    log::error!("failed to read {name}: {e:?}");
                    PendingRead::Abandoned(ticket)
                }
            };
            settle(&slot, &ctx, read);
        });
    });
    input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
    onchange.forget();
    input.click();
    Ok(())
}

/// Load `html` into a hidden iframe and open the print dialog for it.
pub(crate) fn print_html(html: &str) -> Result<(), JsValue> {
    let document = document()?;
    if let Some(old) = document.get_element_by_id(PRINT_FRAME_ID) {
        old.remove();
    }
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?;

    let frame = document
        .create_element("iframe")?
        .dyn_into::<web_sys::HtmlIFrameElement>()
        .map_err(|_| JsValue::from_str("not an iframe element"))?;
    frame.set_id(PRINT_FRAME_ID);
    frame.set_attribute("style", "position:fixed;width:0;height:0;border:0;")?;

    let target = frame.clone();
    let onload = Closure::<dyn FnMut()>::new(move || {
        if let Some(window) = target.content_window()
            && let Err(e) = window.print()
        {
            log::error!("print failed: {e:?}");
        }
    });
    frame.set_onload(Some(onload.as_ref().unchecked_ref()));
    onload.forget();
    frame.set_srcdoc(html);
    body.append_child(&frame)?;
    Ok(())
}
