//! Project chat: message list, quick prompts, and input box.
//!
//! SYSTEM CONTEXT
//! ==============
//! Sending posts the message over HTTP; the assistant reply streams back as
//! `chat_*` frames on the project websocket. The panel subscribes to the chat
//! frame kinds for as long as it is mounted and folds frames into
//! [`ChatState`].
//!
//! ERROR HANDLING
//! ==============
//! A failed POST appends a local error message. Stream errors replace the
//! streaming message's content. History load failures are logged only.

#[cfg(test)]
#[path = "chat_panel_test.rs"]
mod chat_panel_test;

use leptos::prelude::*;

use crate::net::api::ApiClient;
use crate::net::types::{ChatContext, ChatMessageRequest, Project};
use crate::state::chat::{ChatMessage, ChatState, QUICK_PROMPTS, Role};
use crate::util::time::{format_clock, now_ms};

/// DOM id of the sentinel at the end of the message list.
const MESSAGES_END_ID: &str = "chat-panel-end";

const STREAMING_CURSOR: &str = "▋";

fn input_placeholder(sending: bool) -> &'static str {
    if sending {
        "Sending..."
    } else {
        "Type your message... (Shift+Enter for new line)"
    }
}

/// Chat panel bound to `project`. Expects a `RwSignal<ChatState>` in context.
#[component]
pub fn ChatPanel(project: Project) -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let chat = expect_context::<RwSignal<ChatState>>();
    let input = RwSignal::new(String::new());

    #[cfg(feature = "hydrate")]
    {
        let listener = crate::net::frame_client::subscribe(&crate::net::types::FrameKind::CHAT, move |frame| {
            chat.update(|c| {
                c.apply_frame(frame, now_ms());
            });
        });
        on_cleanup(move || {
            crate::net::frame_client::unsubscribe(listener);
        });
    }

    load_history(&api, chat, project.project_id.clone());

    // Follow the conversation as messages and tokens arrive.
    Effect::new(move || {
        let _ = chat.with(|c| c.messages.last().map(|m| (m.id.clone(), m.content.len())));
        request_animation_frame(|| crate::util::dom::scroll_into_view(MESSAGES_END_ID));
    });

    let institution = project.institution.clone();
    let send = Callback::new(move |text: String| {
        let mut accepted = false;
        chat.update(|c| accepted = c.begin_send(&text, now_ms()));
        if !accepted {
            return;
        }
        input.set(String::new());
        let request = ChatMessageRequest {
            project_id: project.project_id.clone(),
            message: text,
            context: ChatContext::from(&project),
        };
        post_message(&api, chat, request);
    });

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            send.run(input.get_untracked());
        }
    };

    let sending = move || chat.get().sending;
    let has_messages = move || !chat.get().messages.is_empty();
    let show_prompts = move || !has_messages() || !sending();

    view! {
        <div class="chat-panel">
            <div class="chat-panel__messages">
                <Show when=move || !has_messages()>
                    <div class="chat-panel__welcome">
                        <h3>{format!("Welcome to {institution}")}</h3>
                        <p>"I can help you with job analysis, resume alignment, and cover letter drafting."</p>
                        <p class="chat-panel__welcome-hint">"Try one of the suggestions below or type your own request."</p>
                    </div>
                </Show>
                <For
                    each=move || chat.get().messages
                    key=|m| (m.id.clone(), m.content.len(), m.streaming, m.error)
                    children=move |message| view! { <ChatBubble message=message /> }
                />
                <div id=MESSAGES_END_ID></div>
            </div>

            <Show when=show_prompts>
                <div class="chat-panel__prompts">
                    {QUICK_PROMPTS
                        .into_iter()
                        .map(|prompt| {
                            view! {
                                <button
                                    class="chat-panel__chip"
                                    disabled=sending
                                    on:click=move |_| send.run(prompt.message.to_owned())
                                >
                                    {prompt.label}
                                </button>
                            }
                        })
                        .collect::<Vec<_>>()}
                </div>
            </Show>

            <div class="chat-panel__input-row">
                <textarea
                    class="chat-panel__input"
                    rows="2"
                    placeholder=move || input_placeholder(sending())
                    disabled=sending
                    prop:value=move || input.get()
                    on:input=move |ev| input.set(event_target_value(&ev))
                    on:keydown=on_keydown
                ></textarea>
                <button
                    class="btn chat-panel__send"
                    disabled=move || !chat.get().can_send(&input.get())
                    on:click=move |_| send.run(input.get_untracked())
                >
                    "Send"
                </button>
            </div>
        </div>
    }
}

/// One message bubble with badge, usage, copy action, and timestamp.
#[component]
fn ChatBubble(message: ChatMessage) -> impl IntoView {
    let role_class = match message.role {
        Role::User => "chat-bubble chat-bubble--user",
        Role::Assistant if message.error => "chat-bubble chat-bubble--assistant chat-bubble--error",
        Role::Assistant => "chat-bubble chat-bubble--assistant",
    };
    let badge = message.running_skill().map(|skill| format!("Running: {skill}"));
    let usage = message
        .usage
        .filter(|_| message.role == Role::Assistant && !message.streaming);
    let copy_text = message.copyable().then(|| message.content.clone());
    let time = format_clock(message.timestamp);

    view! {
        <div class=role_class>
            <div class="chat-bubble__body">
                {badge.map(|text| view! { <div class="chat-bubble__badge">{text}</div> })}
                <div class="chat-bubble__content">
                    {message.content.clone()}
                    {message.streaming.then(|| view! { <span class="chat-bubble__cursor">{STREAMING_CURSOR}</span> })}
                </div>
                {usage
                    .map(|u| {
                        view! {
                            <div class="chat-bubble__usage">
                                <span>{format!("{} in", u.input_tokens)}</span>
                                <span>{format!("{} out", u.output_tokens)}</span>
                            </div>
                        }
                    })}
                {copy_text
                    .map(|text| {
                        view! {
                            <button
                                class="chat-bubble__copy"
                                on:click=move |_| crate::util::dom::copy_to_clipboard(&text)
                            >
                                "Copy"
                            </button>
                        }
                    })}
            </div>
            <div class="chat-bubble__time">{time}</div>
        </div>
    }
}

fn load_history(api: &ApiClient, chat: RwSignal<ChatState>, project_id: String) {
    #[cfg(feature = "hydrate")]
    {
        let api = api.clone();
        leptos::task::spawn_local(async move {
            match api.chat_history(&project_id).await {
                Ok(history) => {
                    let now = now_ms();
                    let messages = history
                        .into_iter()
                        .enumerate()
                        .map(|(index, message)| {
                            let timestamp = message
                                .timestamp
                                .as_deref()
                                .and_then(crate::util::time::parse_timestamp_ms)
                                .unwrap_or(now);
                            ChatMessage::from_history(message, index, timestamp)
                        })
                        .collect();
                    chat.update(|c| c.load_history(messages));
                }
                Err(e) => leptos::logging::warn!("chat history load failed: {e}"),
            }
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (api, chat, project_id);
    }
}

fn post_message(api: &ApiClient, chat: RwSignal<ChatState>, request: ChatMessageRequest) {
    #[cfg(feature = "hydrate")]
    {
        let api = api.clone();
        leptos::task::spawn_local(async move {
            match api.send_chat_message(&request).await {
                Ok(ack) => leptos::logging::log!("chat message accepted: {}", ack.message_id),
                Err(e) => {
                    leptos::logging::warn!("chat send failed: {e}");
                    chat.update(|c| c.send_failed(now_ms()));
                }
            }
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (api, chat, request);
    }
}
