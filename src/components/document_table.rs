use leptos::prelude::*;

use crate::models::table::{suggestions, view_rows, ColumnSpec, SortState, TableRow};

const SUGGESTION_LIMIT: usize = 8;

/// Searchable, sortable listing shared by the articles, news and team pages.
///
/// Rows link to `{edit_base}/{id}`. When `on_delete` is set each row gets a
/// delete button guarded by a browser confirmation.
#[component]
pub fn DocumentTable(
    #[prop(into)] rows: Signal<Vec<TableRow>>,
    columns: Vec<ColumnSpec>,
    edit_base: &'static str,
    #[prop(default = None)] on_delete: Option<Callback<String>>,
) -> impl IntoView {
    let columns = StoredValue::new(columns);
    let (query, set_query) = signal(String::new());
    let (sort, set_sort) = signal(SortState::default());

    let visible = Memo::new(move |_| {
        columns.with_value(|cols| view_rows(&rows.get(), cols, &query.get(), sort.get()))
    });
    let hints = Memo::new(move |_| {
        columns.with_value(|cols| suggestions(&rows.get(), cols, &query.get(), SUGGESTION_LIMIT))
    });
    let list_id = format!("{}-suggestions", edit_base.trim_start_matches('/').replace('/', "-"));

    let header = move || {
        columns.with_value(|cols| {
            cols.iter()
                .enumerate()
                .map(|(idx, col)| {
                    let label = col.label;
                    if col.sortable {
                        view! {
                            <th
                                class="cursor-pointer select-none"
                                on:click=move |_| set_sort.update(|s| *s = s.toggled(idx))
                            >
                                {label}
                                " "
                                {move || {
                                    let s = sort.get();
                                    if s.column == Some(idx) { s.direction.indicator() } else { "" }
                                }}
                            </th>
                        }
                        .into_any()
                    } else {
                        view! { <th>{label}</th> }.into_any()
                    }
                })
                .collect_view()
        })
    };

    view! {
        <div class="space-y-4">
            <input
                type="search"
                class="input input-bordered w-full max-w-md"
                placeholder="Search..."
                list=list_id.clone()
                prop:value=query
                on:input=move |ev| set_query.set(event_target_value(&ev))
            />
            <datalist id=list_id>
                <For
                    each=move || hints.get()
                    key=|hint| hint.clone()
                    children=|hint| view! { <option value=hint></option> }
                />
            </datalist>

            <div class="overflow-x-auto bg-base-100 rounded-box">
                <table class="table table-zebra">
                    <thead>
                        <tr>
                            {header}
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || visible.get()
                            key=|row| row.id.clone()
                            children=move |row| {
                                let id = row.id.clone();
                                let href = format!("{edit_base}/{id}");
                                view! {
                                    <tr>
                                        {row
                                            .cells
                                            .into_iter()
                                            .map(|cell| view! { <td>{cell.display}</td> })
                                            .collect_view()}
                                        <td class="flex gap-2 justify-end">
                                            <a class="btn btn-sm btn-ghost" href=href>"Edit"</a>
                                            {on_delete.map(|cb| {
                                                let id = id.clone();
                                                view! {
                                                    <button
                                                        class="btn btn-sm btn-error btn-outline"
                                                        on:click=move |_| {
                                                            if confirm_delete() {
                                                                cb.run(id.clone());
                                                            }
                                                        }
                                                    >
                                                        "Delete"
                                                    </button>
                                                }
                                            })}
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
                <Show when=move || visible.with(|v| v.is_empty())>
                    <p class="p-6 text-center text-base-content/60">"No entries found."</p>
                </Show>
            </div>
        </div>
    }
}

fn confirm_delete() -> bool {
    window()
        .confirm_with_message("Are you sure you want to delete this entry?")
        .unwrap_or(false)
}
