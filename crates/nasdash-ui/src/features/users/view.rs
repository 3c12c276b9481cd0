//! User management page.

use crate::app::api::use_api;
use crate::app::poll::use_poll;
use crate::components::card::Card;
use crate::components::status::{EmptyState, PageStatus};
use crate::core::action::ActionState;
use crate::core::format::format_timestamp;
use crate::features::users::state::{
    DELETE_FAILURE_MESSAGE, FAILURE_MESSAGE, SAVE_FAILURE_MESSAGE, USERS, UserFormState,
    UsersResources, delete_user, save_user,
};
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use gloo::utils::window;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[function_component(UsersPage)]
pub(crate) fn users_page() -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let t = |key: &str, default: &str| bundle.text(key, default);
    let api = use_api();
    let resources = use_memo(|_| UsersResources::new(&api.backend()), ());
    let poll = {
        let resources = resources.clone();
        let message = t("users.error", FAILURE_MESSAGE);
        use_poll(bundle.locale, move |_| resources.group(&message))
    };
    let form = use_state(UserFormState::default);
    let action = use_state(ActionState::default);
    let backend = api.backend();

    let on_username = {
        let form = form.clone();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            form.set(UserFormState {
                username: input.value(),
                ..(*form).clone()
            });
        })
    };
    let on_password = {
        let form = form.clone();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            form.set(UserFormState {
                password: input.value(),
                ..(*form).clone()
            });
        })
    };
    let on_disabled = {
        let form = form.clone();
        Callback::from(move |event: Event| {
            let input: HtmlInputElement = event.target_unchecked_into();
            form.set(UserFormState {
                disabled: input.checked(),
                ..(*form).clone()
            });
        })
    };
    let on_reset = {
        let form = form.clone();
        let action = action.clone();
        Callback::from(move |_: MouseEvent| {
            form.set(UserFormState::default());
            action.set(ActionState::default());
        })
    };
    let on_submit = {
        let form = form.clone();
        let action = action.clone();
        let poll = poll.clone();
        let backend = backend.clone();
        let fallback = t("users.save_error", SAVE_FAILURE_MESSAGE);
        let bundle = bundle.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let request = match form.to_request() {
                Ok(request) => request,
                Err(err) => {
                    action.set(ActionState::Failed(
                        bundle.text(err.message_key(), &err.to_string()),
                    ));
                    return;
                }
            };
            let mut next = (*action).clone();
            if !next.begin() {
                return;
            }
            action.set(next.clone());
            let pending = save_user(&backend, &request);
            let form = form.clone();
            let action = action.clone();
            let poll = poll.clone();
            let fallback = fallback.clone();
            yew::platform::spawn_local(async move {
                let result = pending.await;
                next.finish(&result, &fallback);
                if result.is_ok() {
                    form.set(UserFormState::default());
                    poll.refetch_only(&[USERS]);
                }
                action.set(next);
            });
        })
    };

    let list = resources.users.current().map_or_else(Html::default, |users| {
        if users.is_empty() {
            return html! { <EmptyState icon="fa-users" message={t("users.empty", "暂无用户")} /> };
        }
        html! {
            <table class="users-table">
                <thead>
                    <tr>
                        <th>{t("users.username", "用户名")}</th>
                        <th>{t("users.status", "状态")}</th>
                        <th>{t("users.created_at", "创建时间")}</th>
                        <th>{t("users.updated_at", "更新时间")}</th>
                        <th>{t("users.actions", "操作")}</th>
                    </tr>
                </thead>
                <tbody>
                    {for users.iter().map(|user| {
                        let on_edit = {
                            let form = form.clone();
                            let action = action.clone();
                            let next = UserFormState::from_user(user);
                            Callback::from(move |_: MouseEvent| {
                                form.set(next.clone());
                                action.set(ActionState::default());
                            })
                        };
                        let on_delete = {
                            let action = action.clone();
                            let poll = poll.clone();
                            let backend = backend.clone();
                            let username = user.username.clone();
                            let prompt = format!("{} {}?", t("users.confirm_delete", "确定删除用户"), user.username);
                            let fallback = t("users.delete_error", DELETE_FAILURE_MESSAGE);
                            Callback::from(move |_: MouseEvent| {
                                if !window().confirm_with_message(&prompt).unwrap_or(false) {
                                    return;
                                }
                                let mut next = (*action).clone();
                                if !next.begin() {
                                    return;
                                }
                                action.set(next.clone());
                                let pending = delete_user(&backend, &username);
                                let action = action.clone();
                                let poll = poll.clone();
                                let fallback = fallback.clone();
                                yew::platform::spawn_local(async move {
                                    let result = pending.await;
                                    next.finish(&result, &fallback);
                                    if result.is_ok() {
                                        poll.refetch_only(&[USERS]);
                                    }
                                    action.set(next);
                                });
                            })
                        };
                        html! {
                            <tr key={user.id.clone()}>
                                <td>{user.username.clone()}</td>
                                <td>
                                    <span class={classes!("status-badge", if user.disabled { "disabled" } else { "enabled" })}>
                                        {if user.disabled { t("users.disabled", "已禁用") } else { t("users.enabled", "正常") }}
                                    </span>
                                </td>
                                <td>{format_timestamp(&user.created_at)}</td>
                                <td>{format_timestamp(&user.updated_at)}</td>
                                <td>
                                    <button class="btn btn-small" onclick={on_edit}>
                                        <i class="fas fa-edit"></i>{t("users.edit", "编辑")}
                                    </button>
                                    <button class="btn btn-small btn-danger" disabled={action.is_busy()} onclick={on_delete}>
                                        <i class="fas fa-trash"></i>{t("users.delete", "删除")}
                                    </button>
                                </td>
                            </tr>
                        }
                    })}
                </tbody>
            </table>
        }
    });

    let form_title = if form.is_edit() {
        t("users.edit_title", "编辑用户")
    } else {
        t("users.create_title", "新建用户")
    };

    html! {
        <div class="container">
            <h1 class="page-title">{t("users.title", "用户管理")}</h1>
            <Card title={form_title}>
                <form class="user-form" onsubmit={on_submit}>
                    <label>
                        {t("users.username", "用户名")}
                        <input type="text" value={form.username.clone()} oninput={on_username} />
                    </label>
                    <label>
                        {t("users.password", "密码")}
                        <input
                            type="password"
                            value={form.password.clone()}
                            placeholder={if form.is_edit() { t("users.password_keep", "留空则不修改") } else { String::new() }}
                            oninput={on_password}
                        />
                    </label>
                    <label class="checkbox">
                        <input type="checkbox" checked={form.disabled} onchange={on_disabled} />
                        {t("users.disabled", "已禁用")}
                    </label>
                    <div class="form-actions">
                        <button type="submit" class="btn btn-primary" disabled={action.is_busy()}>
                            {t("users.save", "保存")}
                        </button>
                        if form.is_edit() {
                            <button type="button" class="btn btn-secondary" onclick={on_reset}>
                                {t("users.cancel", "取消")}
                            </button>
                        }
                    </div>
                    {action.error().map_or_else(Html::default, |message| html! {
                        <div class="form-error" role="alert">{message.to_string()}</div>
                    })}
                </form>
            </Card>
            <PageStatus state={poll.state()} loading_label={t("common.loading", "加载中...")}>
                <Card title={t("users.list", "用户列表")}>
                    {list}
                </Card>
            </PageStatus>
        </div>
    }
}
