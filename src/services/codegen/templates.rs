//! Handlebars sources for the generated React project.
//!
//! Output is TypeScript/JSX, so templates never contain a literal double
//! brace outside of a Handlebars expression. String values that end up in
//! code go through the `json` helper to get a valid quoted literal.

/// A named template and where its output lands.
pub(super) struct FileTemplate {
    pub name: &'static str,
    pub path: &'static str,
    pub description: &'static str,
    pub source: &'static str,
}

pub(super) const APP: FileTemplate = FileTemplate {
    name: "app",
    path: "src/App.tsx",
    description: "Main application component with routing and navigation",
    source: r#"import { Redirect, Route, Switch } from "wouter";
import Navigation from "./components/Navigation";
{{#each epics}}
import {{componentName}} from "./pages/{{componentName}}";
{{/each}}

const APP_NAME = {{json appName}};

const routes = [
{{#each epics}}
  { path: "{{route}}", label: {{json title}} },
{{/each}}
];

export default function App() {
  return (
    <div className="min-h-screen bg-gray-50">
      <Navigation appName={APP_NAME} routes={routes} />
      <main className="mx-auto max-w-6xl px-4 py-8">
        <Switch>
{{#each epics}}
          <Route path="{{route}}" component={ {{componentName}} } />
{{/each}}
          <Route path="/">
            <Redirect to="{{firstRoute}}" />
          </Route>
          <Route>
            <p className="text-gray-600">Page not found.</p>
          </Route>
        </Switch>
      </main>
    </div>
  );
}
"#,
};

pub(super) const PAGE: FileTemplate = FileTemplate {
    name: "page",
    path: "src/pages",
    description: "Page component for the epic",
    source: r#"import { useMemo, useState } from "react";
import DataTable, { type Column } from "../components/DataTable";
import FormModal from "../components/FormModal";
import SearchBar from "../components/SearchBar";
import StatsCard from "../components/StatsCard";
import { useLocalStorage } from "../hooks/useLocalStorage";
import { exportToCsv } from "../utils";

interface Story {
  id: string;
  title: string;
  description: string;
  priority: "high" | "medium" | "low";
  status: "todo" | "in-progress" | "done";
  points: number;
  acceptanceCriteria: string[];
}

const EPIC_TITLE = {{json title}};
const EPIC_DESCRIPTION = {{json description}};
const EPIC_GOALS: string[] = {{json goals}};

const initialStories: Story[] = {{json stories}};

const columns: Column<Story>[] = [
  { key: "title", header: "Story" },
  { key: "priority", header: "Priority" },
  { key: "status", header: "Status" },
  { key: "points", header: "Points" },
];

export default function {{componentName}}() {
  const [stories, setStories] = useLocalStorage<Story[]>("{{storageKey}}", initialStories);
  const [query, setQuery] = useState("");
  const [selected, setSelected] = useState<Story | null>(null);
  const [isFormOpen, setFormOpen] = useState(false);

  const visible = useMemo(() => {
    const q = query.trim().toLowerCase();
    if (!q) return stories;
    return stories.filter(
      (story) =>
        story.title.toLowerCase().includes(q) || story.description.toLowerCase().includes(q),
    );
  }, [stories, query]);

  const completed = stories.filter((story) => story.status === "done").length;
  const totalPoints = stories.reduce((sum, story) => sum + story.points, 0);

  const addStory = (values: Record<string, string>) => {
    setStories([
      ...stories,
      {
        id: crypto.randomUUID(),
        title: values.title,
        description: values.description,
        priority: "medium",
        status: "todo",
        points: Number(values.points) || 0,
        acceptanceCriteria: [],
      },
    ]);
    setFormOpen(false);
  };

  return (
    <section className="space-y-6">
      <header className="space-y-2">
        <h1 className="text-2xl font-bold text-gray-900">{EPIC_TITLE}</h1>
        <p className="text-gray-600">{EPIC_DESCRIPTION}</p>
        {EPIC_GOALS.length > 0 && (
          <ul className="list-inside list-disc text-sm text-gray-500">
            {EPIC_GOALS.map((goal) => (
              <li key={goal}>{goal}</li>
            ))}
          </ul>
        )}
      </header>

      <div className="grid gap-4 sm:grid-cols-3">
        <StatsCard label="Stories" value={stories.length} />
        <StatsCard label="Completed" value={completed} />
        <StatsCard label="Story points" value={totalPoints} />
      </div>

      <div className="flex flex-wrap items-center gap-3">
        <SearchBar value={query} onChange={setQuery} placeholder="Search stories" />
        <button
          type="button"
          className="rounded-md bg-indigo-600 px-4 py-2 text-white hover:bg-indigo-700"
          onClick={() => setFormOpen(true)}
        >
          Add story
        </button>
        <button
          type="button"
          className="rounded-md border border-gray-300 px-4 py-2 text-gray-700 hover:bg-gray-100"
          onClick={() => exportToCsv("{{storageKey}}.csv", stories)}
        >
          Export CSV
        </button>
      </div>

      <DataTable columns={columns} rows={visible} rowKey={(story) => story.id} onRowClick={setSelected} />

      {selected && (
        <aside className="rounded-lg border border-gray-200 bg-white p-4">
          <h2 className="text-lg font-semibold">{selected.title}</h2>
          <p className="mt-1 text-gray-600">{selected.description}</p>
          {selected.acceptanceCriteria.length > 0 && (
            <ul className="mt-3 list-inside list-disc text-sm text-gray-700">
              {selected.acceptanceCriteria.map((criterion) => (
                <li key={criterion}>{criterion}</li>
              ))}
            </ul>
          )}
        </aside>
      )}

      <FormModal
        title="New story"
        isOpen={isFormOpen}
        fields={[
          { name: "title", label: "Title" },
          { name: "description", label: "Description", multiline: true },
          { name: "points", label: "Story points" },
        ]}
        onSubmit={addStory}
        onClose={() => setFormOpen(false)}
      />
    </section>
  );
}
"#,
};

pub(super) const NAVIGATION: FileTemplate = FileTemplate {
    name: "navigation",
    path: "src/components/Navigation.tsx",
    description: "Top navigation with one link per epic page",
    source: r#"import { Link, useLocation } from "wouter";

export interface NavRoute {
  path: string;
  label: string;
}

interface NavigationProps {
  appName: string;
  routes: NavRoute[];
}

export default function Navigation({ appName, routes }: NavigationProps) {
  const [location] = useLocation();

  return (
    <nav className="border-b border-gray-200 bg-white" aria-label="Main">
      <div className="mx-auto flex max-w-6xl flex-wrap items-center gap-6 px-4 py-3">
        <span className="text-lg font-semibold text-gray-900">{appName}</span>
        {routes.map((route) => (
          <Link
            key={route.path}
            href={route.path}
            className={
              location === route.path
                ? "font-medium text-indigo-600"
                : "text-gray-600 hover:text-gray-900"
            }
            aria-current={location === route.path ? "page" : undefined}
          >
            {route.label}
          </Link>
        ))}
      </div>
    </nav>
  );
}
"#,
};

pub(super) const DATA_TABLE: FileTemplate = FileTemplate {
    name: "data_table",
    path: "src/components/DataTable.tsx",
    description: "Sortable table for displaying records",
    source: r#"import { useMemo, useState } from "react";

export interface Column<T> {
  key: keyof T & string;
  header: string;
}

interface DataTableProps<T> {
  columns: Column<T>[];
  rows: T[];
  rowKey: (row: T) => string;
  onRowClick?: (row: T) => void;
}

export default function DataTable<T>({ columns, rows, rowKey, onRowClick }: DataTableProps<T>) {
  const [sortKey, setSortKey] = useState<(keyof T & string) | null>(null);
  const [ascending, setAscending] = useState(true);

  const sorted = useMemo(() => {
    if (!sortKey) return rows;
    return [...rows].sort((a, b) => {
      const left = String(a[sortKey]);
      const right = String(b[sortKey]);
      const order = left.localeCompare(right, undefined, { numeric: true });
      return ascending ? order : -order;
    });
  }, [rows, sortKey, ascending]);

  const toggleSort = (key: keyof T & string) => {
    if (key === sortKey) {
      setAscending(!ascending);
    } else {
      setSortKey(key);
      setAscending(true);
    }
  };

  if (rows.length === 0) {
    return <p className="rounded-lg border border-dashed border-gray-300 p-6 text-center text-gray-500">No records yet.</p>;
  }

  return (
    <div className="overflow-x-auto rounded-lg border border-gray-200 bg-white">
      <table className="min-w-full divide-y divide-gray-200">
        <thead className="bg-gray-50">
          <tr>
            {columns.map((column) => (
              <th
                key={column.key}
                scope="col"
                className="cursor-pointer px-4 py-2 text-left text-sm font-semibold text-gray-700"
                onClick={() => toggleSort(column.key)}
                aria-sort={sortKey === column.key ? (ascending ? "ascending" : "descending") : "none"}
              >
                {column.header}
              </th>
            ))}
          </tr>
        </thead>
        <tbody className="divide-y divide-gray-100">
          {sorted.map((row) => (
            <tr
              key={rowKey(row)}
              className={onRowClick ? "cursor-pointer hover:bg-gray-50" : undefined}
              onClick={onRowClick ? () => onRowClick(row) : undefined}
            >
              {columns.map((column) => (
                <td key={column.key} className="px-4 py-2 text-sm text-gray-700">
                  {String(row[column.key])}
                </td>
              ))}
            </tr>
          ))}
        </tbody>
      </table>
    </div>
  );
}
"#,
};

pub(super) const SEARCH_BAR: FileTemplate = FileTemplate {
    name: "search_bar",
    path: "src/components/SearchBar.tsx",
    description: "Search input with clear button",
    source: r#"interface SearchBarProps {
  value: string;
  onChange: (value: string) => void;
  placeholder?: string;
}

export default function SearchBar({ value, onChange, placeholder = "Search" }: SearchBarProps) {
  return (
    <div className="relative flex-1">
      <input
        type="search"
        value={value}
        placeholder={placeholder}
        aria-label={placeholder}
        onChange={(event) => onChange(event.target.value)}
        className="w-full rounded-md border border-gray-300 px-3 py-2 focus:border-indigo-500 focus:outline-none"
      />
      {value && (
        <button
          type="button"
          aria-label="Clear search"
          className="absolute right-2 top-2 text-gray-400 hover:text-gray-600"
          onClick={() => onChange("")}
        >
          ×
        </button>
      )}
    </div>
  );
}
"#,
};

pub(super) const STATS_CARD: FileTemplate = FileTemplate {
    name: "stats_card",
    path: "src/components/StatsCard.tsx",
    description: "Card displaying a single metric",
    source: r#"interface StatsCardProps {
  label: string;
  value: number | string;
}

export default function StatsCard({ label, value }: StatsCardProps) {
  return (
    <div className="rounded-lg border border-gray-200 bg-white p-4">
      <p className="text-sm text-gray-500">{label}</p>
      <p className="mt-1 text-2xl font-semibold text-gray-900">{value}</p>
    </div>
  );
}
"#,
};

pub(super) const FORM_MODAL: FileTemplate = FileTemplate {
    name: "form_modal",
    path: "src/components/FormModal.tsx",
    description: "Modal form for adding or editing records",
    source: r#"import { type FormEvent, useState } from "react";

export interface FormField {
  name: string;
  label: string;
  multiline?: boolean;
}

interface FormModalProps {
  title: string;
  isOpen: boolean;
  fields: FormField[];
  onSubmit: (values: Record<string, string>) => void;
  onClose: () => void;
}

export default function FormModal({ title, isOpen, fields, onSubmit, onClose }: FormModalProps) {
  const [values, setValues] = useState<Record<string, string>>({});

  if (!isOpen) return null;

  const handleSubmit = (event: FormEvent) => {
    event.preventDefault();
    onSubmit(values);
    setValues({});
  };

  return (
    <div className="fixed inset-0 z-10 flex items-center justify-center bg-black/40" role="dialog" aria-modal="true" aria-label={title}>
      <form onSubmit={handleSubmit} className="w-full max-w-md space-y-4 rounded-lg bg-white p-6 shadow-xl">
        <h2 className="text-lg font-semibold">{title}</h2>
        {fields.map((field) => (
          <label key={field.name} className="block text-sm text-gray-700">
            {field.label}
            {field.multiline ? (
              <textarea
                className="mt-1 w-full rounded-md border border-gray-300 px-3 py-2"
                value={values[field.name] ?? ""}
                onChange={(event) => setValues({ ...values, [field.name]: event.target.value })}
              />
            ) : (
              <input
                className="mt-1 w-full rounded-md border border-gray-300 px-3 py-2"
                value={values[field.name] ?? ""}
                onChange={(event) => setValues({ ...values, [field.name]: event.target.value })}
              />
            )}
          </label>
        ))}
        <div className="flex justify-end gap-2">
          <button type="button" className="rounded-md px-4 py-2 text-gray-700 hover:bg-gray-100" onClick={onClose}>
            Cancel
          </button>
          <button type="submit" className="rounded-md bg-indigo-600 px-4 py-2 text-white hover:bg-indigo-700">
            Save
          </button>
        </div>
      </form>
    </div>
  );
}
"#,
};

pub(super) const USE_API: FileTemplate = FileTemplate {
    name: "use_api",
    path: "src/hooks/useApi.ts",
    description: "Data fetching hook with loading and error state",
    source: r#"import { useCallback, useEffect, useState } from "react";

const API_BASE = import.meta.env.VITE_API_BASE ?? "/api";

export function useApi<T>(path: string) {
  const [data, setData] = useState<T | null>(null);
  const [error, setError] = useState<string | null>(null);
  const [loading, setLoading] = useState(true);

  const load = useCallback(async () => {
    setLoading(true);
    setError(null);
    try {
      const response = await fetch(`${API_BASE}${path}`);
      if (!response.ok) {
        throw new Error(`Request failed with status ${response.status}`);
      }
      setData((await response.json()) as T);
    } catch (err) {
      setError(err instanceof Error ? err.message : String(err));
    } finally {
      setLoading(false);
    }
  }, [path]);

  useEffect(() => {
    void load();
  }, [load]);

  return { data, error, loading, reload: load };
}
"#,
};

pub(super) const USE_LOCAL_STORAGE: FileTemplate = FileTemplate {
    name: "use_local_storage",
    path: "src/hooks/useLocalStorage.ts",
    description: "State hook persisted to localStorage",
    source: r#"import { useEffect, useState } from "react";

export function useLocalStorage<T>(key: string, initialValue: T) {
  const [value, setValue] = useState<T>(() => {
    const stored = window.localStorage.getItem(key);
    if (stored === null) return initialValue;
    try {
      return JSON.parse(stored) as T;
    } catch {
      return initialValue;
    }
  });

  useEffect(() => {
    window.localStorage.setItem(key, JSON.stringify(value));
  }, [key, value]);

  return [value, setValue] as const;
}
"#,
};

pub(super) const UTILS: FileTemplate = FileTemplate {
    name: "utils",
    path: "src/utils/index.ts",
    description: "Formatting and CSV export helpers",
    source: r#"export function formatDate(value: string | number | Date): string {
  return new Date(value).toLocaleDateString(undefined, { year: "numeric", month: "short", day: "numeric" });
}

export function formatNumber(value: number): string {
  return new Intl.NumberFormat().format(value);
}

function escapeCsv(value: unknown): string {
  const text = Array.isArray(value) ? value.join("; ") : String(value ?? "");
  return /[",\n]/.test(text) ? `"${text.replace(/"/g, '""')}"` : text;
}

export function toCsv<T extends object>(rows: T[]): string {
  if (rows.length === 0) return "";
  const headers = Object.keys(rows[0]) as (keyof T)[];
  const lines = rows.map((row) => headers.map((header) => escapeCsv(row[header])).join(","));
  return [headers.join(","), ...lines].join("\n");
}

export function exportToCsv<T extends object>(filename: string, rows: T[]): void {
  const blob = new Blob([toCsv(rows)], { type: "text/csv;charset=utf-8" });
  const url = URL.createObjectURL(blob);
  const link = document.createElement("a");
  link.href = url;
  link.download = filename;
  link.click();
  URL.revokeObjectURL(url);
}
"#,
};

pub(super) const VITE_CONFIG: FileTemplate = FileTemplate {
    name: "vite_config",
    path: "vite.config.ts",
    description: "Vite build configuration",
    source: r#"import react from "@vitejs/plugin-react";
import { defineConfig } from "vite";

export default defineConfig({
  plugins: [react()],
  server: { port: 5173 },
});
"#,
};

pub(super) const TAILWIND_CONFIG: FileTemplate = FileTemplate {
    name: "tailwind_config",
    path: "tailwind.config.js",
    description: "Tailwind CSS configuration",
    source: r#"/** @type {import('tailwindcss').Config} */
export default {
  content: ["./index.html", "./src/**/*.{ts,tsx}"],
  theme: { extend: {} },
  plugins: [],
};
"#,
};

pub(super) const POSTCSS_CONFIG: FileTemplate = FileTemplate {
    name: "postcss_config",
    path: "postcss.config.js",
    description: "PostCSS configuration for Tailwind",
    source: r#"export default {
  plugins: { tailwindcss: {}, autoprefixer: {} },
};
"#,
};

pub(super) const TSCONFIG: FileTemplate = FileTemplate {
    name: "tsconfig",
    path: "tsconfig.json",
    description: "TypeScript compiler configuration",
    source: r#"{
  "compilerOptions": {
    "target": "ES2020",
    "lib": ["ES2020", "DOM", "DOM.Iterable"],
    "module": "ESNext",
    "moduleResolution": "bundler",
    "jsx": "react-jsx",
    "strict": true,
    "noUnusedLocals": true,
    "noUnusedParameters": true,
    "skipLibCheck": true,
    "isolatedModules": true,
    "noEmit": true,
    "types": ["vite/client"]
  },
  "include": ["src"]
}
"#,
};

pub(super) const ESLINT_CONFIG: FileTemplate = FileTemplate {
    name: "eslint_config",
    path: ".eslintrc.cjs",
    description: "ESLint configuration",
    source: r#"module.exports = {
  root: true,
  env: { browser: true, es2020: true },
  parser: "@typescript-eslint/parser",
  plugins: ["@typescript-eslint", "react-hooks"],
  extends: [
    "eslint:recommended",
    "plugin:@typescript-eslint/recommended",
    "plugin:react-hooks/recommended",
  ],
  ignorePatterns: ["dist"],
};
"#,
};

pub(super) const INDEX_HTML: FileTemplate = FileTemplate {
    name: "index_html",
    path: "index.html",
    description: "HTML entry point",
    source: r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>{{htmlTitle}}</title>
  </head>
  <body>
    <div id="root"></div>
    <script type="module" src="/src/main.tsx"></script>
  </body>
</html>
"#,
};

pub(super) const MAIN_TSX: FileTemplate = FileTemplate {
    name: "main_tsx",
    path: "src/main.tsx",
    description: "React entry point",
    source: r#"import { StrictMode } from "react";
import { createRoot } from "react-dom/client";
import App from "./App";
import "./index.css";

const root = document.getElementById("root");
if (!root) {
  throw new Error("Root element not found");
}

createRoot(root).render(
  <StrictMode>
    <App />
  </StrictMode>,
);
"#,
};

pub(super) const INDEX_CSS: FileTemplate = FileTemplate {
    name: "index_css",
    path: "src/index.css",
    description: "Tailwind CSS entry stylesheet",
    source: r#"@tailwind base;
@tailwind components;
@tailwind utilities;
"#,
};

pub(super) const README: &str = r#"# {{appName}}

Frontend scaffold generated from the "{{appName}}" product requirements. It has {{epicCount}} pages, one per epic, covering {{storyCount}} user stories ({{totalPoints}} story points).

## Getting started

```bash
npm install
npm run dev
```

Open http://localhost:5173.

## Epics
{{#each epics}}

### {{title}}

{{description}}

Page: `src/pages/{{componentName}}.tsx` at `{{route}}`

{{#each stories}}
- **{{title}}** ({{priority}}, {{points}} pts): {{description}}
{{/each}}
{{/each}}

## Project layout

- `src/App.tsx`: routes and navigation
- `src/pages/`: one page per epic
- `src/components/`: Navigation, DataTable, SearchBar, StatsCard, FormModal
- `src/hooks/`: useApi, useLocalStorage
- `src/utils/`: formatting and CSV export helpers
"#;

pub(super) const DEPLOY_NOTES: &str = r#"Deploying {{appName}}

1. Install dependencies: npm install
2. Build the production bundle: npm run build
3. The static site is written to dist/. Serve it from any static host
   (Netlify, Vercel, S3 + CloudFront, nginx).
4. Configure the host to rewrite unknown paths to /index.html so client-side
   routes ({{#each epics}}{{route}}{{#unless @last}}, {{/unless}}{{/each}}) load on refresh.
5. Set VITE_API_BASE at build time if the pages should call a backend API.
"#;

pub(super) const SHARED_FILES: [FileTemplate; 5] =
    [NAVIGATION, DATA_TABLE, SEARCH_BAR, STATS_CARD, FORM_MODAL];
pub(super) const HOOK_FILES: [FileTemplate; 2] = [USE_API, USE_LOCAL_STORAGE];
pub(super) const UTIL_FILES: [FileTemplate; 1] = [UTILS];
pub(super) const CONFIG_FILES: [FileTemplate; 9] = [
    VITE_CONFIG,
    TAILWIND_CONFIG,
    POSTCSS_CONFIG,
    TSCONFIG,
    ESLINT_CONFIG,
    INDEX_HTML,
    MAIN_TSX,
    INDEX_CSS,
    // package.json is rendered from the manifest value
    PACKAGE_JSON,
];

pub(super) const PACKAGE_JSON: FileTemplate = FileTemplate {
    name: "package_json",
    path: "package.json",
    description: "npm package manifest",
    source: "{{json manifest}}\n",
};
